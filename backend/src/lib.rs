//! Real-estate listings backend: property CRUD with an admin approval
//! workflow, buyer-to-owner inquiries, saved properties, and role-based
//! access control over a Postgres store.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};

pub mod access;
pub mod approval;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod inquiry;
pub mod mail;
pub mod models;
pub mod property;
pub mod saved;
pub mod schema;
pub mod store;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub mailer: Arc<dyn mail::Mailer>,
    pub images: Arc<dyn images::ImageHost>,
}

async fn root() -> &'static str {
    "Real Estate Listings API"
}

/// Builds the full route table. Every request passes through the
/// authenticate middleware, which resolves the session and applies the
/// static route-class gate.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/properties",
            get(property::get_properties)
                .post(property::create_property)
                .put(property::update_property)
                .delete(property::delete_property),
        )
        .route(
            "/admin/properties",
            get(approval::get_properties_for_review).patch(approval::review_property),
        )
        .route(
            "/inquiries",
            get(inquiry::get_inquiries)
                .post(inquiry::create_inquiry)
                .patch(inquiry::update_inquiry),
        )
        .route("/users", get(users::get_users))
        .route("/user/promote", post(users::promote_user))
        .route("/user/demote", post(users::demote_user))
        .route("/user/delete", post(users::delete_user))
        .route(
            "/saved",
            get(saved::get_saved_properties)
                .post(saved::save_property)
                .delete(saved::unsave_property),
        )
        .route("/upload-image", post(images::upload_images))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access::authenticate,
        ))
        .with_state(state)
}
