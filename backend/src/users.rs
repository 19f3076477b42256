//! Admin-only user administration: role changes, listing, deletion.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::access;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::models::{Role, User};
use crate::store::pg::PgStore;
use crate::store::Store;
use crate::AppState;

const USERS_PER_PAGE: i64 = 10;

pub fn promote(
    store: &mut dyn Store,
    identity: &Identity,
    user_id: &str,
) -> Result<User, ApiError> {
    access::require_role(identity, &[Role::Admin])?;
    store
        .update_user_role(user_id, Role::Admin)?
        .ok_or(ApiError::NotFound("User"))
}

/// Demotion back to a regular user; an admin cannot demote themself.
pub fn demote(store: &mut dyn Store, identity: &Identity, user_id: &str) -> Result<User, ApiError> {
    access::require_role(identity, &[Role::Admin])?;
    if identity.id == user_id {
        return Err(ApiError::validation("Cannot demote yourself"));
    }
    store
        .update_user_role(user_id, Role::User)?
        .ok_or(ApiError::NotFound("User"))
}

/// Account deletion, with the same self-referential guard as demotion.
pub fn remove(store: &mut dyn Store, identity: &Identity, user_id: &str) -> Result<(), ApiError> {
    access::require_role(identity, &[Role::Admin])?;
    if identity.id == user_id {
        return Err(ApiError::validation("Cannot delete yourself"));
    }
    if !store.delete_user(user_id)? {
        return Err(ApiError::NotFound("User"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub users: Vec<User>,
    pub total_users: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

pub fn list(
    store: &mut dyn Store,
    identity: &Identity,
    search: &str,
    page: i64,
) -> Result<UsersPage, ApiError> {
    access::require_role(identity, &[Role::Admin])?;
    let page = page.max(1);
    let (users, total_users) = store.list_users(search, page, USERS_PER_PAGE)?;
    Ok(UsersPage {
        users,
        total_users,
        current_page: page,
        total_pages: (total_users + USERS_PER_PAGE - 1) / USERS_PER_PAGE,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    pub user_id: Option<String>,
}

impl UserIdRequest {
    fn required(&self) -> Result<&str, ApiError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::validation("User ID is required"))
    }
}

/// `POST /user/promote`
pub async fn promote_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<UserIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = input.required()?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    promote(&mut store, &identity, user_id)?;
    Ok(Json(json!({
        "success": true,
        "message": "User promoted to admin",
    })))
}

/// `POST /user/demote`
pub async fn demote_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<UserIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = input.required()?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    demote(&mut store, &identity, user_id)?;
    Ok(Json(json!({
        "success": true,
        "message": "Admin demoted to regular user",
    })))
}

/// `POST /user/delete`
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<UserIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = input.required()?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    remove(&mut store, &identity, user_id)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

/// `GET /users`
pub async fn get_users(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UsersPage>, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let page = list(
        &mut store,
        &identity,
        query.search.as_deref().unwrap_or(""),
        query.page.unwrap_or(1),
    )?;
    Ok(Json(page))
}
