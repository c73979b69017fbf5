pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::NaiveTime;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Members
        .route("/members", get(routes::members::list_members))
        .route("/members/{name}", post(routes::members::add_member))
        .route("/members/{name}", delete(routes::members::remove_member))
        // Out of office
        .route("/outofoffice", get(routes::out_of_office::team_windows))
        .route(
            "/outofoffice/{name}",
            get(routes::out_of_office::member_window),
        )
        .route(
            "/outofoffice/{name}/{from}/{to}",
            post(routes::out_of_office::set_window),
        )
        // Rota
        .route("/rota/next", get(routes::rota::next))
        .route("/rota/confirm/{name}/{date}", get(routes::rota::confirm))
        .route("/rota/override/{name}", get(routes::rota::override_pick))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server and the daily pick scheduler, and run until
/// interrupted.
pub async fn serve(state: AppState, port: u16, pick_time: NaiveTime) -> anyhow::Result<()> {
    let app = build_router(state.clone());
    scheduler::spawn(state, pick_time);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("rota listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
