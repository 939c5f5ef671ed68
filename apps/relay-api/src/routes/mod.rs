pub mod auth;
pub mod channels;
pub mod health;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(crate::relay::server::router())
        .nest("/api/v1", auth::router().merge(channels::router()))
}
