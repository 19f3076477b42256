//! In-memory [`Store`] used by the test suite.
//!
//! Mirrors the Postgres semantics the domain layer relies on: serial ids,
//! newest-first listings, idempotent saved-property inserts.

use std::collections::BTreeMap;

use crate::models::{
    Inquiry, InquiryStatus, NewInquiry, NewProperty, NewUser, Property, PropertyChanges,
    PropertyStatus, PropertySummary, Role, SavedProperty, User,
};

use super::{PropertyFilter, Store, StoreError};

#[derive(Debug, Default)]
pub struct MemStore {
    users: BTreeMap<String, User>,
    properties: BTreeMap<i32, Property>,
    inquiries: BTreeMap<i32, Inquiry>,
    saved: Vec<SavedProperty>,
    next_property_id: i32,
    next_inquiry_id: i32,
    next_saved_id: i32,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }

    fn newest_first(mut properties: Vec<Property>) -> Vec<Property> {
        properties.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        properties
    }
}

impl Store for MemStore {
    fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: user.created_at,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn find_user(&mut self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).cloned())
    }

    fn update_user_role(&mut self, id: &str, role: Role) -> Result<Option<User>, StoreError> {
        Ok(self.users.get_mut(id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    fn delete_user(&mut self, id: &str) -> Result<bool, StoreError> {
        Ok(self.users.remove(id).is_some())
    }

    fn list_users(
        &mut self,
        search: &str,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<User>, i64), StoreError> {
        let needle = search.to_lowercase();
        let mut matches: Vec<User> = self
            .users
            .values()
            .filter(|user| user.first_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let total = matches.len() as i64;
        let page = matches
            .into_iter()
            .skip(((page - 1) * per_page).max(0) as usize)
            .take(per_page.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    fn insert_property(&mut self, property: NewProperty) -> Result<Property, StoreError> {
        self.next_property_id += 1;
        let property = Property {
            id: self.next_property_id,
            title: property.title,
            description: property.description,
            details: property.details,
            price: property.price,
            location: property.location,
            image_url: property.image_url,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            sqft: property.sqft,
            year_built: property.year_built,
            property_type: property.property_type,
            is_for_sale: property.is_for_sale,
            rooms: property.rooms,
            indoor_features: property.indoor_features,
            outdoor_amenities: property.outdoor_amenities,
            view: property.view,
            status: property.status,
            owner_id: property.owner_id,
            created_at: property.created_at,
            updated_at: property.updated_at,
        };
        self.properties.insert(property.id, property.clone());
        Ok(property)
    }

    fn find_property(&mut self, id: i32) -> Result<Option<Property>, StoreError> {
        Ok(self.properties.get(&id).cloned())
    }

    fn update_property(
        &mut self,
        id: i32,
        changes: &PropertyChanges,
        updated_at: i64,
    ) -> Result<Option<Property>, StoreError> {
        Ok(self.properties.get_mut(&id).map(|property| {
            if let Some(title) = &changes.title {
                property.title = title.clone();
            }
            if let Some(description) = &changes.description {
                property.description = description.clone();
            }
            if let Some(details) = &changes.details {
                property.details = details.clone();
            }
            if let Some(price) = changes.price {
                property.price = price;
            }
            if let Some(location) = &changes.location {
                property.location = location.clone();
            }
            if let Some(image_url) = &changes.image_url {
                property.image_url = Some(image_url.clone());
            }
            if let Some(bedrooms) = changes.bedrooms {
                property.bedrooms = bedrooms;
            }
            if let Some(bathrooms) = changes.bathrooms {
                property.bathrooms = bathrooms;
            }
            if let Some(sqft) = changes.sqft {
                property.sqft = sqft;
            }
            if let Some(year_built) = changes.year_built {
                property.year_built = Some(year_built);
            }
            if let Some(property_type) = &changes.property_type {
                property.property_type = Some(property_type.clone());
            }
            if let Some(is_for_sale) = changes.is_for_sale {
                property.is_for_sale = is_for_sale;
            }
            if let Some(rooms) = &changes.rooms {
                property.rooms = rooms.clone();
            }
            if let Some(indoor_features) = &changes.indoor_features {
                property.indoor_features = indoor_features.clone();
            }
            if let Some(outdoor_amenities) = &changes.outdoor_amenities {
                property.outdoor_amenities = outdoor_amenities.clone();
            }
            if let Some(view) = &changes.view {
                property.view = view.clone();
            }
            property.updated_at = updated_at;
            property.clone()
        }))
    }

    fn delete_property(&mut self, id: i32) -> Result<bool, StoreError> {
        self.saved.retain(|saved| saved.property_id != id);
        Ok(self.properties.remove(&id).is_some())
    }

    fn set_property_status(
        &mut self,
        id: i32,
        status: PropertyStatus,
        updated_at: i64,
    ) -> Result<Option<Property>, StoreError> {
        Ok(self.properties.get_mut(&id).map(|property| {
            property.status = status;
            property.updated_at = updated_at;
            property.clone()
        }))
    }

    fn list_properties(&mut self, filter: &PropertyFilter) -> Result<Vec<Property>, StoreError> {
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let matches: Vec<Property> = self
            .properties
            .values()
            .filter(|property| {
                needle
                    .as_ref()
                    .map_or(true, |n| property.location.to_lowercase().contains(n))
            })
            .filter(|property| {
                filter
                    .status
                    .map_or(true, |status| property.status == status)
            })
            .filter(|property| {
                filter
                    .owner_id
                    .as_ref()
                    .map_or(true, |owner| &property.owner_id == owner)
            })
            .cloned()
            .collect();
        let mut matches = Self::newest_first(matches);
        if filter.limit > 0 {
            matches.truncate(filter.limit as usize);
        }
        Ok(matches)
    }

    fn insert_inquiry(&mut self, inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        self.next_inquiry_id += 1;
        let inquiry = Inquiry {
            id: self.next_inquiry_id,
            property_id: inquiry.property_id,
            sender_id: inquiry.sender_id,
            name: inquiry.name,
            email: inquiry.email,
            phone: inquiry.phone,
            message: inquiry.message,
            status: inquiry.status,
            created_at: inquiry.created_at,
        };
        self.inquiries.insert(inquiry.id, inquiry.clone());
        Ok(inquiry)
    }

    fn find_inquiry(&mut self, id: i32) -> Result<Option<Inquiry>, StoreError> {
        Ok(self.inquiries.get(&id).cloned())
    }

    fn set_inquiry_status(
        &mut self,
        id: i32,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>, StoreError> {
        Ok(self.inquiries.get_mut(&id).map(|inquiry| {
            inquiry.status = status;
            inquiry.clone()
        }))
    }

    fn list_inquiries_for_property(
        &mut self,
        property_id: i32,
    ) -> Result<Vec<Inquiry>, StoreError> {
        let mut matches: Vec<Inquiry> = self
            .inquiries
            .values()
            .filter(|inquiry| inquiry.property_id == property_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matches)
    }

    fn list_inquiries_for_sender(
        &mut self,
        sender_id: &str,
    ) -> Result<Vec<(Inquiry, PropertySummary)>, StoreError> {
        let mut matches: Vec<Inquiry> = self
            .inquiries
            .values()
            .filter(|inquiry| inquiry.sender_id == sender_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matches
            .into_iter()
            .filter_map(|inquiry| {
                let summary = self
                    .properties
                    .get(&inquiry.property_id)
                    .map(PropertySummary::from)?;
                Some((inquiry, summary))
            })
            .collect())
    }

    fn save_property(&mut self, user_id: &str, property_id: i32) -> Result<(), StoreError> {
        let exists = self
            .saved
            .iter()
            .any(|saved| saved.user_id == user_id && saved.property_id == property_id);
        if !exists {
            self.next_saved_id += 1;
            self.saved.push(SavedProperty {
                id: self.next_saved_id,
                user_id: user_id.to_string(),
                property_id,
                created_at: chrono::Utc::now().timestamp(),
            });
        }
        Ok(())
    }

    fn unsave_property(&mut self, user_id: &str, property_id: i32) -> Result<bool, StoreError> {
        let before = self.saved.len();
        self.saved
            .retain(|saved| !(saved.user_id == user_id && saved.property_id == property_id));
        Ok(self.saved.len() < before)
    }

    fn list_saved(&mut self, user_id: &str) -> Result<Vec<Property>, StoreError> {
        let mut saved: Vec<&SavedProperty> = self
            .saved
            .iter()
            .filter(|saved| saved.user_id == user_id)
            .collect();
        saved.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(saved
            .into_iter()
            .filter_map(|saved| self.properties.get(&saved.property_id).cloned())
            .collect())
    }
}
