use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::interface::http::contacts_handler::{
    create_contact, delete_contact, get_contact, healthcheck, list_contacts, update_contact,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
