//! Property-store collaborator seam.
//!
//! The HTTP layer and the domain operations only see the [`Store`] trait;
//! [`pg::PgStore`] backs it with Diesel in production and [`mem::MemStore`]
//! backs it in the test suite.

use thiserror::Error;

use crate::models::{
    Inquiry, InquiryStatus, NewInquiry, NewProperty, NewUser, Property, PropertyChanges,
    PropertyStatus, PropertySummary, Role, User,
};

pub mod mem;
pub mod pg;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connection(#[from] diesel::result::ConnectionError),
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    /// A stored enumeration value outside its canonical set.
    #[error("unrecognized {field} value in store: {value}")]
    Decode { field: &'static str, value: String },
}

/// Listing filter; `status: None` means no status restriction (admin-only in
/// practice, the domain layer decides the effective filter) and `limit: 0`
/// means unbounded.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub search: Option<String>,
    pub status: Option<PropertyStatus>,
    pub owner_id: Option<String>,
    pub limit: i64,
}

pub trait Store: Send {
    // Users
    fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError>;
    fn find_user(&mut self, id: &str) -> Result<Option<User>, StoreError>;
    fn update_user_role(&mut self, id: &str, role: Role) -> Result<Option<User>, StoreError>;
    fn delete_user(&mut self, id: &str) -> Result<bool, StoreError>;
    /// Paginated, case-insensitive first-name search. Returns the page and
    /// the total match count.
    fn list_users(
        &mut self,
        search: &str,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<User>, i64), StoreError>;

    // Properties
    fn insert_property(&mut self, property: NewProperty) -> Result<Property, StoreError>;
    fn find_property(&mut self, id: i32) -> Result<Option<Property>, StoreError>;
    fn update_property(
        &mut self,
        id: i32,
        changes: &PropertyChanges,
        updated_at: i64,
    ) -> Result<Option<Property>, StoreError>;
    fn delete_property(&mut self, id: i32) -> Result<bool, StoreError>;
    fn set_property_status(
        &mut self,
        id: i32,
        status: PropertyStatus,
        updated_at: i64,
    ) -> Result<Option<Property>, StoreError>;
    /// Newest-first listing under the given filter.
    fn list_properties(&mut self, filter: &PropertyFilter) -> Result<Vec<Property>, StoreError>;

    // Inquiries
    fn insert_inquiry(&mut self, inquiry: NewInquiry) -> Result<Inquiry, StoreError>;
    fn find_inquiry(&mut self, id: i32) -> Result<Option<Inquiry>, StoreError>;
    fn set_inquiry_status(
        &mut self,
        id: i32,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>, StoreError>;
    fn list_inquiries_for_property(&mut self, property_id: i32)
        -> Result<Vec<Inquiry>, StoreError>;
    /// All inquiries created by the sender, newest first, each joined with a
    /// minimal property summary.
    fn list_inquiries_for_sender(
        &mut self,
        sender_id: &str,
    ) -> Result<Vec<(Inquiry, PropertySummary)>, StoreError>;

    // Saved properties
    /// Idempotent: saving an already-saved property is a no-op.
    fn save_property(&mut self, user_id: &str, property_id: i32) -> Result<(), StoreError>;
    fn unsave_property(&mut self, user_id: &str, property_id: i32) -> Result<bool, StoreError>;
    fn list_saved(&mut self, user_id: &str) -> Result<Vec<Property>, StoreError>;
}
