//! Saved-property (favorite) relation: unique per (user, property) pair.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::models::Property;
use crate::store::pg::PgStore;
use crate::store::Store;
use crate::AppState;

pub fn save(
    store: &mut dyn Store,
    identity: &Identity,
    property_id: i32,
) -> Result<(), ApiError> {
    store
        .find_property(property_id)?
        .ok_or(ApiError::NotFound("Property"))?;
    store.save_property(&identity.id, property_id)?;
    Ok(())
}

pub fn unsave(
    store: &mut dyn Store,
    identity: &Identity,
    property_id: i32,
) -> Result<(), ApiError> {
    if !store.unsave_property(&identity.id, property_id)? {
        return Err(ApiError::NotFound("Saved property"));
    }
    Ok(())
}

pub fn list_for_user(
    store: &mut dyn Store,
    identity: &Identity,
) -> Result<Vec<Property>, ApiError> {
    Ok(store.list_saved(&identity.id)?)
}

/// `GET /saved`
pub async fn get_saved_properties(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Property>>, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let properties = list_for_user(&mut store, &identity)?;
    Ok(Json(properties))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequest {
    pub property_id: Option<i32>,
}

impl SavedRequest {
    fn required(&self) -> Result<i32, ApiError> {
        self.property_id
            .ok_or_else(|| ApiError::validation("Property ID is required"))
    }
}

/// `POST /saved`
pub async fn save_property(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<SavedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let property_id = input.required()?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    save(&mut store, &identity, property_id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Property saved!" })),
    ))
}

/// `DELETE /saved`
pub async fn unsave_property(
    State(state): State<AppState>,
    identity: Identity,
    Query(input): Query<SavedRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let property_id = input.required()?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    unsave(&mut store, &identity, property_id)?;
    Ok(Json(json!({ "message": "Property removed from saved!" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::{self, SubmitProperty};
    use crate::models::Role;
    use crate::store::mem::MemStore;

    fn identity(id: &str, role: Role) -> Identity {
        Identity {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            role,
        }
    }

    fn seeded() -> (MemStore, Identity, i32) {
        let mut store = MemStore::new();
        let owner = identity("owner-1", Role::User);
        let property = approval::submit(
            &mut store,
            &owner,
            &SubmitProperty {
                title: "Mountain Retreat".into(),
                price: Some(895_000),
                location: "Aspen, CO".into(),
                ..SubmitProperty::default()
            },
        )
        .unwrap();
        (store, identity("u-1", Role::User), property.id)
    }

    #[test]
    fn save_requires_existing_property() {
        let (mut store, user, _) = seeded();
        assert!(matches!(
            save(&mut store, &user, 999),
            Err(ApiError::NotFound("Property"))
        ));
    }

    #[test]
    fn save_is_idempotent_per_pair() {
        let (mut store, user, property_id) = seeded();
        save(&mut store, &user, property_id).unwrap();
        save(&mut store, &user, property_id).unwrap();
        assert_eq!(list_for_user(&mut store, &user).unwrap().len(), 1);
    }

    #[test]
    fn unsave_round_trip() {
        let (mut store, user, property_id) = seeded();
        save(&mut store, &user, property_id).unwrap();
        unsave(&mut store, &user, property_id).unwrap();
        assert!(list_for_user(&mut store, &user).unwrap().is_empty());
        assert!(matches!(
            unsave(&mut store, &user, property_id),
            Err(ApiError::NotFound("Saved property"))
        ));
    }
}
