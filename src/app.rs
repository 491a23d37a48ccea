use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{domains::registration::rest::registration_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .merge(registration_routes())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
