//! Public listing queries and owner-scoped property CRUD.
//!
//! Creation goes through the approval workflow (`approval::submit`); this
//! module covers reads and the owner/admin mutations of content fields.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::access;
use crate::approval::{self, SubmitProperty};
use crate::auth::{Identity, MaybeIdentity};
use crate::error::ApiError;
use crate::models::{Property, PropertyChanges, PropertyStatus, Role};
use crate::store::pg::PgStore;
use crate::store::{PropertyFilter, Store};
use crate::AppState;

/// Public listings are capped; the admin review queue is not.
const LISTING_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub owner_id: Option<String>,
}

/// Listing with the role-gated default visibility rule: without an explicit
/// status filter, non-admin callers see approved properties only.
pub fn listing(
    store: &mut dyn Store,
    identity: Option<&Identity>,
    params: &ListParams,
) -> Result<Vec<Property>, ApiError> {
    let is_admin = identity.is_some_and(|identity| identity.role == Role::Admin);
    let status = match params.status.as_deref() {
        Some(raw) => {
            let status = PropertyStatus::parse(raw)
                .ok_or_else(|| ApiError::InvalidStatus(raw.to_string()))?;
            if status != PropertyStatus::Approved && !is_admin {
                return Err(ApiError::Forbidden);
            }
            Some(status)
        }
        None if is_admin => None,
        None => Some(PropertyStatus::Approved),
    };
    let properties = store.list_properties(&PropertyFilter {
        search: params.search.clone(),
        status,
        owner_id: params.owner_id.clone(),
        limit: LISTING_LIMIT,
    })?;
    Ok(properties)
}

/// Content-field update by the owner or an admin.
pub fn update(
    store: &mut dyn Store,
    identity: &Identity,
    property_id: i32,
    changes: &PropertyChanges,
) -> Result<Property, ApiError> {
    let existing = store
        .find_property(property_id)?
        .ok_or(ApiError::NotFound("Property"))?;
    access::require_owner_or_admin(identity, &existing.owner_id)?;
    let now = chrono::Utc::now().timestamp();
    store
        .update_property(property_id, changes, now)?
        .ok_or(ApiError::NotFound("Property"))
}

pub fn remove(
    store: &mut dyn Store,
    identity: &Identity,
    property_id: i32,
) -> Result<(), ApiError> {
    let existing = store
        .find_property(property_id)?
        .ok_or(ApiError::NotFound("Property"))?;
    access::require_owner_or_admin(identity, &existing.owner_id)?;
    store.delete_property(property_id)?;
    Ok(())
}

/// `GET /properties`
pub async fn get_properties(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let properties = listing(&mut store, identity.as_ref(), &params)?;
    Ok(Json(properties))
}

/// `POST /properties`
pub async fn create_property(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<SubmitProperty>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let property = approval::submit(&mut store, &identity, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Property submitted for approval!",
            "property": property,
        })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub id: Option<i32>,
    #[serde(flatten)]
    pub changes: PropertyChanges,
}

/// `PUT /properties`
pub async fn update_property(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<UpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Property ID is required"))?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    let property = update(&mut store, &identity, id, &input.changes)?;
    Ok(Json(json!({
        "message": "Property updated successfully!",
        "property": property,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<i32>,
}

/// `DELETE /properties`
pub async fn delete_property(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = params
        .id
        .ok_or_else(|| ApiError::validation("Property ID is required"))?;
    let mut store = PgStore::connect(&state.config.database_url)?;
    remove(&mut store, &identity, id)?;
    Ok(Json(json!({ "message": "Property deleted successfully!" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem::MemStore;

    fn identity(id: &str, role: Role) -> Identity {
        Identity {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            role,
        }
    }

    fn seeded() -> (MemStore, Identity, Identity) {
        let mut store = MemStore::new();
        let owner = identity("u-1", Role::User);
        let admin = identity("a-1", Role::Admin);
        for (title, location) in [
            ("Luxury Modern Villa", "Malibu, CA"),
            ("Downtown Luxury Condo", "New York, NY"),
        ] {
            let input = SubmitProperty {
                title: title.into(),
                price: Some(1_200_000),
                location: location.into(),
                ..SubmitProperty::default()
            };
            let property = approval::submit(&mut store, &owner, &input).unwrap();
            approval::set_status(&mut store, &admin, property.id, "approved").unwrap();
        }
        let pending = SubmitProperty {
            title: "Newly Listed Loft".into(),
            price: Some(750_000),
            location: "Seattle, WA".into(),
            ..SubmitProperty::default()
        };
        approval::submit(&mut store, &owner, &pending).unwrap();
        (store, owner, admin)
    }

    #[test]
    fn anonymous_listing_sees_approved_only() {
        let (mut store, _, _) = seeded();
        let properties = listing(&mut store, None, &ListParams::default()).unwrap();
        assert_eq!(properties.len(), 2);
        assert!(properties
            .iter()
            .all(|p| p.status == PropertyStatus::Approved));
    }

    #[test]
    fn admin_listing_sees_everything_by_default() {
        let (mut store, _, admin) = seeded();
        let properties = listing(&mut store, Some(&admin), &ListParams::default()).unwrap();
        assert_eq!(properties.len(), 3);
    }

    #[test]
    fn explicit_review_filters_are_admin_only() {
        let (mut store, owner, admin) = seeded();
        let params = ListParams {
            status: Some("pending".into()),
            ..ListParams::default()
        };
        assert!(matches!(
            listing(&mut store, Some(&owner), &params),
            Err(ApiError::Forbidden)
        ));
        assert_eq!(listing(&mut store, Some(&admin), &params).unwrap().len(), 1);

        let bad = ListParams {
            status: Some("live".into()),
            ..ListParams::default()
        };
        assert!(matches!(
            listing(&mut store, Some(&admin), &bad),
            Err(ApiError::InvalidStatus(_))
        ));
    }

    #[test]
    fn search_matches_location_case_insensitively() {
        let (mut store, _, _) = seeded();
        let params = ListParams {
            search: Some("malibu".into()),
            ..ListParams::default()
        };
        let properties = listing(&mut store, None, &params).unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].title, "Luxury Modern Villa");
    }

    #[test]
    fn update_is_owner_or_admin() {
        let (mut store, owner, admin) = seeded();
        let target = listing(&mut store, Some(&admin), &ListParams::default()).unwrap()[0].id;

        let stranger = identity("u-2", Role::User);
        let changes = PropertyChanges {
            price: Some(999_000),
            ..PropertyChanges::default()
        };
        assert!(matches!(
            update(&mut store, &stranger, target, &changes),
            Err(ApiError::Forbidden)
        ));

        let updated = update(&mut store, &owner, target, &changes).unwrap();
        assert_eq!(updated.price, 999_000);

        let updated = update(&mut store, &admin, target, &changes).unwrap();
        assert_eq!(updated.price, 999_000);
    }

    #[test]
    fn delete_checks_ownership_and_existence() {
        let (mut store, owner, _) = seeded();
        assert!(matches!(
            remove(&mut store, &owner, 404),
            Err(ApiError::NotFound("Property"))
        ));

        let stranger = identity("u-2", Role::User);
        let target = listing(&mut store, None, &ListParams::default()).unwrap()[0].id;
        assert!(matches!(
            remove(&mut store, &stranger, target),
            Err(ApiError::Forbidden)
        ));
        remove(&mut store, &owner, target).unwrap();
        assert!(store.find_property(target).unwrap().is_none());
    }
}
