//! Buyer-to-owner inquiry messaging.
//!
//! Creation durably stores the record first; the two notification mails
//! (owner + sender) are fire-and-forget and never fail the request.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use validator::Validate;

use crate::access;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::mail::{templates, Email, Mailer};
use crate::models::{Inquiry, InquiryStatus, NewInquiry, Property, PropertySummary, User};
use crate::store::pg::PgStore;
use crate::store::Store;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiry {
    pub property_id: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Stores a new inquiry against an existing property. Returns the property
/// and its owner alongside so the caller can dispatch notifications without
/// re-reading the store.
pub fn create(
    store: &mut dyn Store,
    identity: &Identity,
    input: &CreateInquiry,
) -> Result<(Inquiry, Property, User), ApiError> {
    let property_id = input
        .property_id
        .ok_or_else(|| ApiError::validation("Property ID is required"))?;
    input
        .validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let property = store
        .find_property(property_id)?
        .ok_or(ApiError::NotFound("Property"))?;
    let owner = store
        .find_user(&property.owner_id)?
        .ok_or(ApiError::NotFound("User"))?;

    let inquiry = store.insert_inquiry(NewInquiry {
        property_id,
        sender_id: identity.id.clone(),
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        message: input.message.clone(),
        status: InquiryStatus::Unread,
        created_at: chrono::Utc::now().timestamp(),
    })?;
    Ok((inquiry, property, owner))
}

/// Inquiries received for a property; the property owner only.
pub fn list_for_property(
    store: &mut dyn Store,
    identity: &Identity,
    property_id: i32,
) -> Result<Vec<Inquiry>, ApiError> {
    let property = store
        .find_property(property_id)?
        .ok_or(ApiError::NotFound("Property"))?;
    if property.owner_id != identity.id {
        return Err(ApiError::Forbidden);
    }
    Ok(store.list_inquiries_for_property(property_id)?)
}

#[derive(Debug, Serialize)]
pub struct SenderInquiry {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub property: PropertySummary,
}

/// Everything the caller has sent, joined with a property summary.
pub fn list_for_sender(
    store: &mut dyn Store,
    identity: &Identity,
) -> Result<Vec<SenderInquiry>, ApiError> {
    let rows = store.list_inquiries_for_sender(&identity.id)?;
    Ok(rows
        .into_iter()
        .map(|(inquiry, property)| SenderInquiry { inquiry, property })
        .collect())
}

/// Read-state transition by the owner of the inquiry's property (or an
/// admin).
pub fn update_status(
    store: &mut dyn Store,
    identity: &Identity,
    inquiry_id: i32,
    raw_status: &str,
) -> Result<Inquiry, ApiError> {
    let inquiry = store
        .find_inquiry(inquiry_id)?
        .ok_or(ApiError::NotFound("Inquiry"))?;
    let property = store
        .find_property(inquiry.property_id)?
        .ok_or(ApiError::NotFound("Property"))?;
    access::require_owner_or_admin(identity, &property.owner_id)?;
    let status = InquiryStatus::parse(raw_status)
        .ok_or_else(|| ApiError::InvalidStatus(raw_status.to_string()))?;
    store
        .set_inquiry_status(inquiry_id, status)?
        .ok_or(ApiError::NotFound("Inquiry"))
}

/// Best-effort notification pair; failures are logged once and dropped.
pub async fn send_notifications(
    mailer: &dyn Mailer,
    base_url: &str,
    property: &Property,
    owner: &User,
    inquiry: &Inquiry,
) {
    let dashboard_url = format!("{base_url}/dashboard/inquiries");
    let (subject, html) = templates::owner_notification(owner, property, inquiry, &dashboard_url);
    if let Err(err) = mailer
        .send(Email {
            to: owner.email.clone(),
            subject,
            html,
        })
        .await
    {
        warn!("failed to send inquiry notification to property owner: {err}");
    }

    let property_url = format!("{base_url}/properties/{}", property.id);
    let (subject, html) = templates::inquiry_confirmation(property, inquiry, &property_url);
    if let Err(err) = mailer
        .send(Email {
            to: inquiry.email.clone(),
            subject,
            html,
        })
        .await
    {
        warn!("failed to send inquiry confirmation to sender: {err}");
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryQuery {
    pub property_id: Option<i32>,
}

/// `GET /inquiries`: owner-scoped when `propertyId` is given, otherwise the
/// caller's own sent inquiries.
pub async fn get_inquiries(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<InquiryQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    match query.property_id {
        Some(property_id) => {
            let inquiries = list_for_property(&mut store, &identity, property_id)?;
            Ok(Json(json!(inquiries)))
        }
        None => {
            let inquiries = list_for_sender(&mut store, &identity)?;
            Ok(Json(json!(inquiries)))
        }
    }
}

/// `POST /inquiries`
pub async fn create_inquiry(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<CreateInquiry>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let (inquiry, property, owner) = create(&mut store, &identity, &input)?;

    // The caller sees success as soon as the record is durable.
    let mailer = state.mailer.clone();
    let base_url = state.config.site_base_url.clone();
    let spawned = inquiry.clone();
    tokio::spawn(async move {
        send_notifications(mailer.as_ref(), &base_url, &property, &owner, &spawned).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Inquiry sent successfully!",
            "inquiry": inquiry,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateInquiryRequest {
    pub id: Option<i32>,
    pub status: Option<String>,
}

/// `PATCH /inquiries`
pub async fn update_inquiry(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<UpdateInquiryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(id), Some(status)) = (input.id, input.status.as_deref()) else {
        return Err(ApiError::validation("ID and status are required"));
    };
    let mut store = PgStore::connect(&state.config.database_url)?;
    let inquiry = update_status(&mut store, &identity, id, status)?;
    Ok(Json(json!({
        "message": "Inquiry updated successfully!",
        "inquiry": inquiry,
    })))
}
