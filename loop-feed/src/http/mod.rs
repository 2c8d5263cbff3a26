//! HTTP facade of the loop feed service.
//!
//! Thin DTO mapping only: handlers translate requests into engine calls and
//! engine outcomes into JSON. No feed logic lives here.
mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::config::Dependencies;

/// Builds the service router over shared dependencies.
pub fn router(deps: Arc<Dependencies>) -> Router {
    Router::new()
        .route("/loops/{loop_id}/posts", post(routes::create_post))
        .route("/loops/{loop_id}/trending", get(routes::trending))
        .route(
            "/loops/{loop_id}/posts/{post_id}/vote",
            post(routes::vote_on_post),
        )
        .route(
            "/loops/{loop_id}/posts/{post_id}/thread",
            get(routes::get_thread),
        )
        .route(
            "/loops/{loop_id}/posts/{post_id}/replies",
            post(routes::create_reply),
        )
        .route(
            "/loops/{loop_id}/posts/{post_id}/replies/{reply_id}/vote",
            post(routes::vote_on_reply),
        )
        .route(
            "/loops/{loop_id}/posts/{post_id}/recount",
            post(routes::recount_post),
        )
        .route(
            "/loops/{loop_id}/posts/{post_id}/replies/{reply_id}/recount",
            post(routes::recount_reply),
        )
        .with_state(deps)
}
