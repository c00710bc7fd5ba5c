//! Trip checklist HTTP handlers.
//!
//! ```text
//! GET    /trip_todos/get-todos
//! POST   /trip_todos/add-todo
//! PUT    /trip_todos/update-todo
//! DELETE /trip_todos/delete-todo
//! ```
//!
//! Todos are the one content collection with an RSVP gate: only guests who
//! answered `YES` may add or edit items, and only the host may delete them.

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::dates::format_itinerary_date;
use crate::domain::ports::TodoChanges;
use crate::domain::{Error, TripTodo};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::{require_confirmed_guest, require_guest, require_host, require_trip};
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponseBody;
use crate::inbound::http::validation::{parse_trip_id, require_non_blank};

/// Request payload for adding a todo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddTodoRequestBody {
    pub trip_id: i32,
    pub todo_id: String,
    pub text: String,
}

/// Request payload for updating a todo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTodoRequestBody {
    pub trip_id: i32,
    pub todo_id: String,
    pub text: Option<String>,
    pub checked: Option<bool>,
}

/// Request payload for deleting a todo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteTodoRequestBody {
    pub trip_id: i32,
    pub todo_id: String,
}

/// One todo as serialised to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoBody {
    pub id: String,
    pub text: String,
    pub checked: bool,
    pub last_updated_by: String,
    pub last_updated_at: String,
}

/// Response payload listing a trip's todos.
#[derive(Debug, Serialize, ToSchema)]
pub struct GetTodosResponseBody {
    pub todos: Vec<TodoBody>,
}

/// Query parameters identifying a trip.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TodosTripQuery {
    pub trip_id: String,
}

/// List a trip's todos.
#[utoipa::path(
    get,
    path = "/trip_todos/get-todos",
    params(TodosTripQuery),
    responses(
        (status = 200, description = "Todo list", body = GetTodosResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a guest", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trip-todos"],
    operation_id = "getTodos",
    security(("BearerToken" = []))
)]
#[get("/get-todos")]
pub async fn get_todos(
    state: web::Data<HttpState>,
    token: BearerToken,
    query: web::Query<TodosTripQuery>,
) -> ApiResult<web::Json<GetTodosResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let trip_id = parse_trip_id(&query.trip_id)?;
    require_trip(&state, trip_id).await?;
    require_guest(&state, trip_id, &identity.user_id).await?;

    let todos = state
        .todos
        .list(trip_id)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|todo| TodoBody {
            id: todo.id,
            text: todo.text,
            checked: todo.checked,
            last_updated_by: todo.last_updated_by.to_string(),
            last_updated_at: format_itinerary_date(todo.last_updated_at),
        })
        .collect();

    Ok(web::Json(GetTodosResponseBody { todos }))
}

/// Add a todo with a client-supplied id. Confirmed guests only.
#[utoipa::path(
    post,
    path = "/trip_todos/add-todo",
    request_body = AddTodoRequestBody,
    responses(
        (status = 201, description = "Todo added", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "RSVP not confirmed", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Duplicate todo id", body = Error)
    ),
    tags = ["trip-todos"],
    operation_id = "addTodo",
    security(("BearerToken" = []))
)]
#[post("/add-todo")]
pub async fn add_todo(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<AddTodoRequestBody>,
) -> ApiResult<(web::Json<MessageResponseBody>, StatusCode)> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_confirmed_guest(&state, payload.trip_id, &identity.user_id).await?;
    require_non_blank(&payload.todo_id, "Todo id is required.")?;
    require_non_blank(&payload.text, "Todo text cannot be empty.")?;

    let todo = TripTodo {
        id: payload.todo_id,
        trip_id: payload.trip_id,
        text: payload.text,
        checked: false,
        last_updated_by: identity.user_id,
        last_updated_at: Utc::now(),
    };
    state.todos.add(&todo).await?;

    Ok((
        web::Json(MessageResponseBody {
            message: "Todo added successfully.".to_owned(),
        }),
        StatusCode::CREATED,
    ))
}

/// Update a todo's text or checked state. Confirmed guests only.
#[utoipa::path(
    put,
    path = "/trip_todos/update-todo",
    request_body = UpdateTodoRequestBody,
    responses(
        (status = 200, description = "Todo updated", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "RSVP not confirmed", body = Error),
        (status = 404, description = "Trip or todo not found", body = Error)
    ),
    tags = ["trip-todos"],
    operation_id = "updateTodo",
    security(("BearerToken" = []))
)]
#[put("/update-todo")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateTodoRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    require_trip(&state, payload.trip_id).await?;
    require_confirmed_guest(&state, payload.trip_id, &identity.user_id).await?;
    if let Some(text) = &payload.text {
        require_non_blank(text, "Todo text cannot be empty.")?;
    }

    let changes = TodoChanges {
        text: payload.text,
        checked: payload.checked,
    };
    let updated = state
        .todos
        .update(
            payload.trip_id,
            &payload.todo_id,
            &changes,
            &identity.user_id,
            Utc::now(),
        )
        .await?;
    if !updated {
        return Err(Error::not_found("Todo not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Todo updated successfully.".to_owned(),
    }))
}

/// Delete a todo. Host only.
#[utoipa::path(
    delete,
    path = "/trip_todos/delete-todo",
    request_body = DeleteTodoRequestBody,
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the host", body = Error),
        (status = 404, description = "Trip or todo not found", body = Error)
    ),
    tags = ["trip-todos"],
    operation_id = "deleteTodo",
    security(("BearerToken" = []))
)]
#[delete("/delete-todo")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<DeleteTodoRequestBody>,
) -> ApiResult<web::Json<MessageResponseBody>> {
    let identity = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let trip = require_trip(&state, payload.trip_id).await?;
    require_host(&trip, &identity.user_id)?;

    let removed = state.todos.remove(payload.trip_id, &payload.todo_id).await?;
    if !removed {
        return Err(Error::not_found("Todo not found."));
    }

    Ok(web::Json(MessageResponseBody {
        message: "Todo deleted successfully.".to_owned(),
    }))
}
