//! Backend entry-point: wires configuration, persistence and REST endpoints.

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use tripmate_backend::ApiDoc;
use tripmate_backend::RequestId;
use tripmate_backend::outbound::persistence::{DbPool, PoolSettings, run_migrations};
use tripmate_backend::server::config::AppConfig;
use tripmate_backend::server::{build_state, configure_api};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    run_migrations(&config.database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::connect(&config.database_url, PoolSettings::default())
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let state = build_state(&config, pool).map_err(std::io::Error::other)?;

    info!(addr = %config.bind_addr, "starting server");
    let bind_addr = config.bind_addr;
    HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RequestId)
            .configure(configure_api);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?
    .run()
    .await
}
