//! Expense-splitting HTTP handlers.
//!
//! ```text
//! POST   /expenses/add-expense
//! GET    /expenses/get-expenses
//! PUT    /expenses/update-expense
//! PUT    /expenses/settle-expense
//! DELETE /expenses/delete-expense
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::ports::{ExpenseRecord, NewExpense, ShareInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_guest, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{parse_trip_id, parse_user_id, require_non_blank};

/// One user's slice of an expense, as sent by clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserInvolvedBody {
    #[serde(rename = "selectedUserId")]
    pub selected_user_id: String,
    pub amount: f64,
}

/// One user's slice of an expense, as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInvolvedDetailBody {
    #[serde(rename = "selectedUserId")]
    pub selected_user_id: String,
    pub amount: f64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// Request payload for adding an expense.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddExpenseRequestBody {
    pub trip_id: i32,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "usersInvolved")]
    pub users_involved: Vec<UserInvolvedBody>,
}

/// Request payload for updating an expense.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateExpenseRequestBody {
    pub trip_id: i32,
    pub expense_id: i32,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "usersInvolved")]
    pub users_involved: Vec<UserInvolvedBody>,
}

/// Request payload for settling an expense.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SettleExpenseRequestBody {
    pub trip_id: i32,
    pub expense_id: i32,
    pub settled: bool,
}

/// Request payload for deleting an expense.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteExpenseRequestBody {
    pub trip_id: i32,
    pub expense_id: i32,
}

/// One expense in a trip's expense list.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseBody {
    #[serde(rename = "expenseId")]
    pub expense_id: i32,
    pub settled: bool,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "createdDate")]
    pub created_date: String,
    #[serde(rename = "updatedDate")]
    pub updated_date: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userFirstName")]
    pub user_first_name: String,
    #[serde(rename = "userLastName")]
    pub user_last_name: String,
    #[serde(rename = "usersInvolved")]
    pub users_involved: Vec<UserInvolvedDetailBody>,
}

/// Response payload listing a trip's expenses.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetExpensesResponseBody {
    pub expenses: Vec<ExpenseBody>,
}

/// Query parameters identifying a trip.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpensesTripQuery {
    pub trip_id: String,
}

fn parse_shares(shares: Vec<UserInvolvedBody>) -> Result<Vec<ShareInput>, Error> {
    shares
        .into_iter()
        .map(|share| {
            let user_id = parse_user_id(&share.selected_user_id, "Invalid user in usersInvolved.")?;
            Ok(ShareInput {
                user_id,
                amount: share.amount,
            })
        })
        .collect()
}

impl From<ExpenseRecord> for ExpenseBody {
    fn from(record: ExpenseRecord) -> Self {
        let created_date = record.expense.created_at.format("%b %d").to_string();
        let updated_date = record.expense.updated_at.format("%b %d").to_string();
        Self {
            expense_id: record.expense.id,
            settled: record.expense.settled,
            title: record.expense.title,
            amount: record.expense.amount,
            created_date,
            updated_date,
            user_id: record.expense.user_id.to_string(),
            user_first_name: record.payer_first_name,
            user_last_name: record.payer_last_name,
            users_involved: record
                .shares
                .into_iter()
                .map(|share| UserInvolvedDetailBody {
                    selected_user_id: share.user_id.to_string(),
                    amount: share.amount,
                    first_name: share.first_name,
                    last_name: share.last_name,
                })
                .collect(),
        }
    }
}

/// Add an expense paid by the caller, with its splits.
#[utoipa::path(
    post,
    path = "/expenses/add-expense",
    request_body = AddExpenseRequestBody,
    responses(
        (status = 201, description = "Expense added", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "addExpense",
    security(("BearerToken" = []))
)]
#[post("/add-expense")]
pub async fn add_expense(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<AddExpenseRequestBody>,
) -> ApiResult<(web::Json<MessageResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.title, "Expense title is required.")?;
    if !payload.amount.is_finite() {
        return Err(Error::invalid_request("Invalid expense amount."));
    }

    let new_expense = NewExpense {
        trip_id: payload.trip_id,
        payer_id: identity.user_id,
        title: payload.title,
        amount: payload.amount,
        shares: parse_shares(payload.users_involved)?,
    };
    state.expenses.add(&new_expense).await?;

    Ok((
        web::Json(MessageResponseBody {
            message: "Expense added successfully.".to_owned(),
        }),
        StatusCode::CREATED,
    ))
}

/// List a trip's expenses with payer names and splits.
#[utoipa::path(
    get,
    path = "/expenses/get-expenses",
    params(ExpensesTripQuery),
    responses(
        (status = 200, description = "Expense list", body = GetExpensesResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "getExpenses",
    security(("BearerToken" = []))
)]
#[get("/get-expenses")]
pub async fn get_expenses(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<ExpensesTripQuery>,
) -> ApiResult<web::Json<GetExpensesResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    require_trip(&state, trip_id).await?;
    require_guest(&state, trip_id, &identity.user_id).await?;

    let expenses = state
        .expenses
        .list(trip_id)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(ExpenseBody::from)
        .collect();

    Ok(web::Json(GetExpensesResponseBody { expenses }))
}

/// Update an expense's title, amount and splits.
#[utoipa::path(
    put,
    path = "/expenses/update-expense",
    request_body = UpdateExpenseRequestBody,
    responses(
        (status = 200, description = "Expense updated", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or expense not found", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "updateExpense",
    security(("BearerToken" = []))
)]
#[put("/update-expense")]
pub async fn update_expense(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateExpenseRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.title, "Expense title is required.")?;
    if !payload.amount.is_finite() {
        return Err(Error::invalid_request("Invalid expense amount."));
    }

    let expense = state
        .expenses
        .find(payload.expense_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("Expense not found."))?;
    if expense.trip_id != payload.trip_id {
        return Err(Error::not_found("Expense not found."));
    }

    let shares = parse_shares(payload.users_involved)?;
    state
        .expenses
        .update(payload.expense_id, &payload.title, payload.amount, &shares)
        .await?;

    Ok(web::Json(MessageResponseBody {
        message: "Expense updated successfully.".to_owned(),
    }))
}

/// Mark an expense settled or unsettled.
#[utoipa::path(
    put,
    path = "/expenses/settle-expense",
    request_body = SettleExpenseRequestBody,
    responses(
        (status = 200, description = "Expense updated", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or expense not found", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "settleExpense",
    security(("BearerToken" = []))
)]
#[put("/settle-expense")]
pub async fn settle_expense(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<SettleExpenseRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let updated = state
        .expenses
        .set_settled(payload.expense_id, payload.settled)
        .await?;
    if !updated {
        return Err(Error::not_found("Expense not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Expense updated successfully.".to_owned(),
    }))
}

/// Delete an expense and its splits.
#[utoipa::path(
    delete,
    path = "/expenses/delete-expense",
    request_body = DeleteExpenseRequestBody,
    responses(
        (status = 200, description = "Expense deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip or expense not found", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense",
    security(("BearerToken" = []))
)]
#[delete("/delete-expense")]
pub async fn delete_expense(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteExpenseRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_guest(&state, payload.trip_id, &identity.user_id).await?;

    let expense = state
        .expenses
        .find(payload.expense_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("Expense not found."))?;
    if expense.trip_id != payload.trip_id {
        return Err(Error::not_found("Expense not found."));
    }

    state.expenses.remove(payload.expense_id).await?;

    Ok(web::Json(MessageResponseBody {
        message: "Expense deleted successfully.".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::domain::{RsvpStatus, Trip, UserId};
    use crate::inbound::http::test_support::{FixtureBackend, test_app};

    const HOST_TOKEN: &str = "host_token";
    const GUEST_TOKEN: &str = "guest_token";
    const OUTSIDER_TOKEN: &str = "outsider_token";

    struct Scenario {
        backend: Arc<FixtureBackend>,
        trip: Trip,
        host: UserId,
        guest: UserId,
    }

    fn scenario() -> Scenario {
        let backend = FixtureBackend::new();
        let host = backend.seed_user("user-host", "+11234567890", "Ada", "Lovelace");
        backend.register_identity(HOST_TOKEN, &host, "+11234567890");
        let guest = backend.seed_user("user-guest", "+19876543210", "Grace", "Hopper");
        backend.register_identity(GUEST_TOKEN, &guest, "+19876543210");
        let outsider = backend.seed_user("user-outsider", "+15551112222", "Alan", "Turing");
        backend.register_identity(OUTSIDER_TOKEN, &outsider, "+15551112222");

        let start = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2022, 1, 30).expect("valid date");
        let trip = backend.seed_trip(&host, "Spain", start, end);
        backend.seed_guest(trip.id, &guest, RsvpStatus::Yes);
        Scenario {
            backend,
            trip,
            host,
            guest,
        }
    }

    fn authed(request: actix_test::TestRequest, token: &str) -> actix_test::TestRequest {
        request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
    }

    fn even_split(host: &UserId, guest: &UserId, amount: f64) -> Vec<UserInvolvedBody> {
        vec![
            UserInvolvedBody {
                selected_user_id: host.to_string(),
                amount: amount / 2.0,
            },
            UserInvolvedBody {
                selected_user_id: guest.to_string(),
                amount: amount / 2.0,
            },
        ]
    }

    #[actix_web::test]
    async fn expense_with_shares_round_trips_through_the_list() {
        let Scenario {
            backend,
            trip,
            host,
            guest,
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "Dinner".to_owned(),
                amount: 100.0,
                users_involved: even_split(&host, &guest, 100.0),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = authed(actix_test::TestRequest::get(), GUEST_TOKEN)
            .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: Value = actix_test::read_body_json(response).await;
        let expenses = value["expenses"].as_array().expect("expenses array");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0]["title"], "Dinner");
        assert_eq!(expenses[0]["userFirstName"], "Ada");
        assert_eq!(expenses[0]["settled"], false);

        let involved = expenses[0]["usersInvolved"].as_array().expect("shares");
        assert_eq!(involved.len(), 2);
        let total: f64 = involved
            .iter()
            .map(|share| share["amount"].as_f64().expect("amount"))
            .sum();
        assert_eq!(total, 100.0);
        assert_eq!(involved[1]["firstName"], "Grace");
    }

    #[actix_web::test]
    async fn non_guests_cannot_add_expenses() {
        let Scenario {
            backend,
            trip,
            host,
            guest,
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), OUTSIDER_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "Dinner".to_owned(),
                amount: 100.0,
                users_involved: even_split(&host, &guest, 100.0),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn blank_titles_and_non_finite_amounts_are_rejected() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "   ".to_owned(),
                amount: 100.0,
                users_involved: Vec::new(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn updating_rewrites_title_amount_and_shares() {
        let Scenario {
            backend,
            trip,
            host,
            guest,
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "Dinner".to_owned(),
                amount: 100.0,
                users_involved: even_split(&host, &guest, 100.0),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let expense_id = {
            let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
                .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
                .to_request();
            let value: Value =
                actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
            value["expenses"][0]["expenseId"].as_i64().expect("id") as i32
        };

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/expenses/update-expense")
            .set_json(UpdateExpenseRequestBody {
                trip_id: trip.id,
                expense_id,
                title: "Dinner and drinks".to_owned(),
                amount: 140.0,
                users_involved: even_split(&host, &guest, 140.0),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
            .to_request();
        let value: Value =
            actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(value["expenses"][0]["title"], "Dinner and drinks");
        assert_eq!(value["expenses"][0]["amount"], 140.0);
        let involved = value["expenses"][0]["usersInvolved"]
            .as_array()
            .expect("shares");
        assert_eq!(involved.len(), 2);
        assert_eq!(involved[0]["amount"], 70.0);
    }

    #[actix_web::test]
    async fn expenses_are_scoped_to_their_trip() {
        let Scenario {
            backend,
            trip,
            host,
            guest,
        } = scenario();
        let other_trip = backend.seed_trip(
            &host,
            "Italy",
            NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2022, 3, 5).expect("valid date"),
        );
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "Dinner".to_owned(),
                amount: 100.0,
                users_involved: even_split(&host, &guest, 100.0),
            })
            .to_request();
        actix_test::call_service(&app, request).await;

        let expense_id = {
            let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
                .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
                .to_request();
            let value: Value =
                actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
            value["expenses"][0]["expenseId"].as_i64().expect("id") as i32
        };

        // Referencing the expense through a different trip must not match.
        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/expenses/delete-expense")
            .set_json(DeleteExpenseRequestBody {
                trip_id: other_trip.id,
                expense_id,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn settling_flips_the_flag() {
        let Scenario {
            backend,
            trip,
            host,
            guest,
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "Dinner".to_owned(),
                amount: 100.0,
                users_involved: even_split(&host, &guest, 100.0),
            })
            .to_request();
        actix_test::call_service(&app, request).await;

        let expense_id = {
            let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
                .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
                .to_request();
            let value: Value =
                actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
            value["expenses"][0]["expenseId"].as_i64().expect("id") as i32
        };

        let request = authed(actix_test::TestRequest::put(), GUEST_TOKEN)
            .uri("/expenses/settle-expense")
            .set_json(SettleExpenseRequestBody {
                trip_id: trip.id,
                expense_id,
                settled: true,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
            .to_request();
        let value: Value =
            actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(value["expenses"][0]["settled"], true);
    }

    #[actix_web::test]
    async fn settling_an_unknown_expense_is_not_found() {
        let Scenario { backend, trip, .. } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::put(), HOST_TOKEN)
            .uri("/expenses/settle-expense")
            .set_json(SettleExpenseRequestBody {
                trip_id: trip.id,
                expense_id: 999,
                settled: true,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn deleting_removes_the_expense_and_its_shares() {
        let Scenario {
            backend,
            trip,
            host,
            guest,
        } = scenario();
        let app = actix_test::init_service(test_app(&backend)).await;

        let request = authed(actix_test::TestRequest::post(), HOST_TOKEN)
            .uri("/expenses/add-expense")
            .set_json(AddExpenseRequestBody {
                trip_id: trip.id,
                title: "Dinner".to_owned(),
                amount: 100.0,
                users_involved: even_split(&host, &guest, 100.0),
            })
            .to_request();
        actix_test::call_service(&app, request).await;

        let expense_id = {
            let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
                .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
                .to_request();
            let value: Value =
                actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
            value["expenses"][0]["expenseId"].as_i64().expect("id") as i32
        };

        let request = authed(actix_test::TestRequest::delete(), HOST_TOKEN)
            .uri("/expenses/delete-expense")
            .set_json(DeleteExpenseRequestBody {
                trip_id: trip.id,
                expense_id,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = authed(actix_test::TestRequest::get(), HOST_TOKEN)
            .uri(&format!("/expenses/get-expenses?trip_id={}", trip.id))
            .to_request();
        let value: Value =
            actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(value["expenses"].as_array().expect("array").len(), 0);
    }
}
