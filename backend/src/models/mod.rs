use std::fmt;

use serde::{Deserialize, Serialize};

/// Authorization scope attached to every account.
///
/// Stored lowercase; parsing accepts any casing because older exports mixed
/// `"ADMIN"` and `"admin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Visitor,
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Visitor => "visitor",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Case-insensitive parse of a stored or client-supplied role tag.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "visitor" => Some(Role::Visitor),
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval lifecycle of a listing. New properties always start `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Pending,
    Approved,
    Rejected,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Pending => "pending",
            PropertyStatus::Approved => "approved",
            PropertyStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(PropertyStatus::Pending),
            "approved" => Some(PropertyStatus::Approved),
            "rejected" => Some(PropertyStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read state of an inquiry, managed by the property owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Unread,
    Read,
    Responded,
}

impl InquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::Unread => "unread",
            InquiryStatus::Read => "read",
            InquiryStatus::Responded => "responded",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unread" => Some(InquiryStatus::Unread),
            "read" => Some(InquiryStatus::Read),
            "responded" => Some(InquiryStatus::Responded),
            _ => None,
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    // Nullable for OAuth-provisioned accounts; never serialized out.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub created_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub details: String,
    pub price: i64,
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
    pub status: PropertyStatus,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub details: String,
    pub price: i64,
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
    pub status: PropertyStatus,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Content-field updates applied by the owner (or an admin). Status changes
/// go through the approval workflow instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub bedrooms: Option<i16>,
    pub bathrooms: Option<i16>,
    pub sqft: Option<i64>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub is_for_sale: Option<bool>,
    pub rooms: Option<Vec<String>>,
    pub indoor_features: Option<Vec<String>>,
    pub outdoor_amenities: Option<Vec<String>>,
    pub view: Option<Vec<String>>,
}

/// Minimal property projection joined onto sender-scoped inquiry lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: i32,
    pub title: String,
    pub location: String,
    pub image_url: Option<String>,
}

impl From<&Property> for PropertySummary {
    fn from(property: &Property) -> Self {
        PropertySummary {
            id: property.id,
            title: property.title.clone(),
            location: property.location.clone(),
            image_url: property.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: i32,
    pub property_id: i32,
    pub sender_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub property_id: i32,
    pub sender_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: i64,
}

/// Favorite marker; unique per (user, property) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProperty {
    pub id: i32,
    pub user_id: String,
    pub property_id: i32,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(" User "), Some(Role::User));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn status_round_trips_through_canonical_form() {
        for status in [
            PropertyStatus::Pending,
            PropertyStatus::Approved,
            PropertyStatus::Rejected,
        ] {
            assert_eq!(PropertyStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PropertyStatus::parse("Approved"), Some(PropertyStatus::Approved));
        assert_eq!(PropertyStatus::parse("live"), None);
    }

    #[test]
    fn inquiry_status_parse() {
        assert_eq!(InquiryStatus::parse("unread"), Some(InquiryStatus::Unread));
        assert_eq!(InquiryStatus::parse("RESPONDED"), Some(InquiryStatus::Responded));
        assert_eq!(InquiryStatus::parse("archived"), None);
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: "u-1".into(),
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            password_hash: Some("secret".into()),
            role: Role::User,
            created_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
