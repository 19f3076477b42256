//! Listing approval workflow.
//!
//! Three states (pending, approved, rejected) with no terminal state: an
//! admin may move a property between any of them, including re-pending an
//! approved listing. Submission always enters review regardless of what the
//! client sent.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::access;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::models::{NewProperty, Property, PropertyStatus, Role};
use crate::store::pg::PgStore;
use crate::store::{PropertyFilter, Store};
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitProperty {
    pub title: String,
    pub description: String,
    pub details: String,
    pub price: Option<i64>,
    pub location: String,
    pub image_url: Option<String>,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub sqft: i64,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub is_for_sale: bool,
    pub rooms: Vec<String>,
    pub indoor_features: Vec<String>,
    pub outdoor_amenities: Vec<String>,
    pub view: Vec<String>,
    /// Accepted but ignored: new listings always enter review.
    pub status: Option<String>,
}

impl Default for SubmitProperty {
    fn default() -> Self {
        SubmitProperty {
            title: String::new(),
            description: String::new(),
            details: String::new(),
            price: None,
            location: String::new(),
            image_url: None,
            bedrooms: 0,
            bathrooms: 0,
            sqft: 0,
            year_built: None,
            property_type: None,
            is_for_sale: true,
            rooms: Vec::new(),
            indoor_features: Vec::new(),
            outdoor_amenities: Vec::new(),
            view: Vec::new(),
            status: None,
        }
    }
}

/// Creates a listing for the caller, forcing `pending`.
pub fn submit(
    store: &mut dyn Store,
    identity: &Identity,
    input: &SubmitProperty,
) -> Result<Property, ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    let price = input
        .price
        .ok_or_else(|| ApiError::validation("Price is required"))?;
    if price <= 0 {
        return Err(ApiError::validation("Price must be greater than zero"));
    }
    if input.location.trim().is_empty() {
        return Err(ApiError::validation("Location is required"));
    }

    let now = chrono::Utc::now().timestamp();
    let property = store.insert_property(NewProperty {
        title: input.title.trim().to_string(),
        description: input.description.clone(),
        details: input.details.clone(),
        price,
        location: input.location.trim().to_string(),
        image_url: input.image_url.clone(),
        bedrooms: input.bedrooms,
        bathrooms: input.bathrooms,
        sqft: input.sqft,
        year_built: input.year_built,
        property_type: input.property_type.clone(),
        is_for_sale: input.is_for_sale,
        rooms: input.rooms.clone(),
        indoor_features: input.indoor_features.clone(),
        outdoor_amenities: input.outdoor_amenities.clone(),
        view: input.view.clone(),
        status: PropertyStatus::Pending,
        owner_id: identity.id.clone(),
        created_at: now,
        updated_at: now,
    })?;
    Ok(property)
}

/// Admin-only transition; any state to any state.
pub fn set_status(
    store: &mut dyn Store,
    identity: &Identity,
    property_id: i32,
    raw_status: &str,
) -> Result<Property, ApiError> {
    access::require_role(identity, &[Role::Admin])?;
    let status = PropertyStatus::parse(raw_status)
        .ok_or_else(|| ApiError::InvalidStatus(raw_status.to_string()))?;
    let now = chrono::Utc::now().timestamp();
    store
        .set_property_status(property_id, status, now)?
        .ok_or(ApiError::NotFound("Property"))
}

/// Status-scoped listing. `approved` is public; the review queues are
/// admin-only.
pub fn list_by_status(
    store: &mut dyn Store,
    identity: Option<&Identity>,
    raw_status: &str,
) -> Result<Vec<Property>, ApiError> {
    let status = PropertyStatus::parse(raw_status)
        .ok_or_else(|| ApiError::InvalidStatus(raw_status.to_string()))?;
    if status != PropertyStatus::Approved
        && !identity.is_some_and(|identity| identity.role == Role::Admin)
    {
        return Err(ApiError::Forbidden);
    }
    let properties = store.list_properties(&PropertyFilter {
        status: Some(status),
        ..PropertyFilter::default()
    })?;
    Ok(properties)
}

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub status: Option<String>,
}

/// `GET /admin/properties`: the review queue, defaulting to pending.
pub async fn get_properties_for_review(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let status = query.status.as_deref().unwrap_or("pending");
    let properties = list_by_status(&mut store, Some(&identity), status)?;
    Ok(Json(properties))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub id: Option<i32>,
    pub status: Option<String>,
}

/// `PATCH /admin/properties`: approve, reject, or re-pend a listing.
pub async fn review_property(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(id), Some(status)) = (input.id, input.status.as_deref()) else {
        return Err(ApiError::validation("Property ID and status are required"));
    };
    let mut store = PgStore::connect(&state.config.database_url)?;
    let property = set_status(&mut store, &identity, id, status)?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("Property {} successfully!", property.status),
            "property": property,
        })),
    ))
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

    fn listing(title: &str) -> SubmitProperty {
        SubmitProperty {
            title: title.to_string(),
            price: Some(650_000),
            location: "Austin, TX".to_string(),
            rooms: vec!["Kitchen".into(), "Living Room".into()],
            ..SubmitProperty::default()
        }
    }

    #[test]
    fn submit_forces_pending_regardless_of_client_status() {
        let mut store = MemStore::new();
        let owner = identity("u-1", Role::User);
        let mut input = listing("Charming Suburban Home");
        input.status = Some("approved".into());

        let property = submit(&mut store, &owner, &input).unwrap();
        assert_eq!(property.status, PropertyStatus::Pending);
        assert_eq!(property.owner_id, "u-1");
    }

    #[test]
    fn submit_requires_title_price_and_location() {
        let mut store = MemStore::new();
        let owner = identity("u-1", Role::User);

        let mut missing_title = listing("x");
        missing_title.title = "  ".into();
        assert!(matches!(
            submit(&mut store, &owner, &missing_title),
            Err(ApiError::Validation(_))
        ));

        let mut missing_price = listing("Home");
        missing_price.price = None;
        assert!(matches!(
            submit(&mut store, &owner, &missing_price),
            Err(ApiError::Validation(_))
        ));

        let mut missing_location = listing("Home");
        missing_location.location = String::new();
        assert!(matches!(
            submit(&mut store, &owner, &missing_location),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn set_status_is_admin_only() {
        let mut store = MemStore::new();
        let owner = identity("u-1", Role::User);
        let property = submit(&mut store, &owner, &listing("Home")).unwrap();

        assert!(matches!(
            set_status(&mut store, &owner, property.id, "approved"),
            Err(ApiError::Forbidden)
        ));
        // Still pending after the refused call.
        assert_eq!(
            store.find_property(property.id).unwrap().unwrap().status,
            PropertyStatus::Pending
        );

        let admin = identity("a-1", Role::Admin);
        let updated = set_status(&mut store, &admin, property.id, "approved").unwrap();
        assert_eq!(updated.status, PropertyStatus::Approved);
    }

    #[test]
    fn set_status_validates_target_and_existence() {
        let mut store = MemStore::new();
        let admin = identity("a-1", Role::Admin);
        assert!(matches!(
            set_status(&mut store, &admin, 99, "approved"),
            Err(ApiError::NotFound("Property"))
        ));

        let owner = identity("u-1", Role::User);
        let property = submit(&mut store, &owner, &listing("Home")).unwrap();
        assert!(matches!(
            set_status(&mut store, &admin, property.id, "live"),
            Err(ApiError::InvalidStatus(_))
        ));
    }

    #[test]
    fn any_state_reaches_any_state() {
        let mut store = MemStore::new();
        let owner = identity("u-1", Role::User);
        let admin = identity("a-1", Role::Admin);
        let property = submit(&mut store, &owner, &listing("Home")).unwrap();

        for target in ["approved", "rejected", "pending", "approved"] {
            let updated = set_status(&mut store, &admin, property.id, target).unwrap();
            assert_eq!(updated.status.as_str(), target);
        }
    }

    #[test]
    fn review_queues_require_admin() {
        let mut store = MemStore::new();
        let owner = identity("u-1", Role::User);
        submit(&mut store, &owner, &listing("Home")).unwrap();

        assert!(matches!(
            list_by_status(&mut store, Some(&owner), "pending"),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            list_by_status(&mut store, None, "rejected"),
            Err(ApiError::Forbidden)
        ));

        let admin = identity("a-1", Role::Admin);
        let pending = list_by_status(&mut store, Some(&admin), "pending").unwrap();
        assert_eq!(pending.len(), 1);

        // Anyone may list approved; nothing is approved yet.
        assert!(list_by_status(&mut store, None, "approved").unwrap().is_empty());
    }
}
