//! Diesel-backed [`Store`] implementation.
//!
//! Row structs mirror the table layout with enumerations as text; conversion
//! into the domain types normalizes them through the case-insensitive
//! parsers.

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db;
use crate::models::{
    Inquiry, InquiryStatus, NewInquiry, NewProperty, NewUser, Property, PropertyChanges,
    PropertyStatus, PropertySummary, Role, User,
};
use crate::schema::{inquiries, properties, saved_properties, users};

use super::{PropertyFilter, Store, StoreError};

pub struct PgStore {
    conn: PgConnection,
}

impl PgStore {
    pub fn new(conn: PgConnection) -> Self {
        PgStore { conn }
    }

    /// One connection per request, as the handlers are stateless.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        Ok(PgStore {
            conn: db::establish_connection(database_url)?,
        })
    }
}

#[derive(Queryable)]
struct UserRow {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: Option<String>,
    role: String,
    created_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, StoreError> {
        let role = Role::parse(&row.role).ok_or_else(|| StoreError::Decode {
            field: "role",
            value: row.role.clone(),
        })?;
        Ok(User {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserRow<'a> {
    id: &'a str,
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    password_hash: Option<&'a str>,
    role: &'a str,
    created_at: i64,
}

#[derive(Queryable)]
struct PropertyRow {
    id: i32,
    title: String,
    description: String,
    details: String,
    price: i64,
    location: String,
    image_url: Option<String>,
    bedrooms: i16,
    bathrooms: i16,
    sqft: i64,
    year_built: Option<i32>,
    property_type: Option<String>,
    is_for_sale: bool,
    rooms: Vec<String>,
    indoor_features: Vec<String>,
    outdoor_amenities: Vec<String>,
    view: Vec<String>,
    status: String,
    owner_id: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<PropertyRow> for Property {
    type Error = StoreError;

    fn try_from(row: PropertyRow) -> Result<Self, StoreError> {
        let status = PropertyStatus::parse(&row.status).ok_or_else(|| StoreError::Decode {
            field: "status",
            value: row.status.clone(),
        })?;
        Ok(Property {
            id: row.id,
            title: row.title,
            description: row.description,
            details: row.details,
            price: row.price,
            location: row.location,
            image_url: row.image_url,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            sqft: row.sqft,
            year_built: row.year_built,
            property_type: row.property_type,
            is_for_sale: row.is_for_sale,
            rooms: row.rooms,
            indoor_features: row.indoor_features,
            outdoor_amenities: row.outdoor_amenities,
            view: row.view,
            status,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = properties)]
struct NewPropertyRow {
    title: String,
    description: String,
    details: String,
    price: i64,
    location: String,
    image_url: Option<String>,
    bedrooms: i16,
    bathrooms: i16,
    sqft: i64,
    year_built: Option<i32>,
    property_type: Option<String>,
    is_for_sale: bool,
    rooms: Vec<String>,
    indoor_features: Vec<String>,
    outdoor_amenities: Vec<String>,
    view: Vec<String>,
    status: String,
    owner_id: String,
    created_at: i64,
    updated_at: i64,
}

impl From<NewProperty> for NewPropertyRow {
    fn from(p: NewProperty) -> Self {
        NewPropertyRow {
            title: p.title,
            description: p.description,
            details: p.details,
            price: p.price,
            location: p.location,
            image_url: p.image_url,
            bedrooms: p.bedrooms,
            bathrooms: p.bathrooms,
            sqft: p.sqft,
            year_built: p.year_built,
            property_type: p.property_type,
            is_for_sale: p.is_for_sale,
            rooms: p.rooms,
            indoor_features: p.indoor_features,
            outdoor_amenities: p.outdoor_amenities,
            view: p.view,
            status: p.status.as_str().to_string(),
            owner_id: p.owner_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = properties)]
struct PropertyChangeset {
    title: Option<String>,
    description: Option<String>,
    details: Option<String>,
    price: Option<i64>,
    location: Option<String>,
    image_url: Option<String>,
    bedrooms: Option<i16>,
    bathrooms: Option<i16>,
    sqft: Option<i64>,
    year_built: Option<i32>,
    property_type: Option<String>,
    is_for_sale: Option<bool>,
    rooms: Option<Vec<String>>,
    indoor_features: Option<Vec<String>>,
    outdoor_amenities: Option<Vec<String>>,
    view: Option<Vec<String>>,
    updated_at: i64,
}

impl PropertyChangeset {
    fn new(changes: &PropertyChanges, updated_at: i64) -> Self {
        PropertyChangeset {
            title: changes.title.clone(),
            description: changes.description.clone(),
            details: changes.details.clone(),
            price: changes.price,
            location: changes.location.clone(),
            image_url: changes.image_url.clone(),
            bedrooms: changes.bedrooms,
            bathrooms: changes.bathrooms,
            sqft: changes.sqft,
            year_built: changes.year_built,
            property_type: changes.property_type.clone(),
            is_for_sale: changes.is_for_sale,
            rooms: changes.rooms.clone(),
            indoor_features: changes.indoor_features.clone(),
            outdoor_amenities: changes.outdoor_amenities.clone(),
            view: changes.view.clone(),
            updated_at,
        }
    }
}

#[derive(Queryable)]
struct InquiryRow {
    id: i32,
    property_id: i32,
    sender_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
    status: String,
    created_at: i64,
}

impl TryFrom<InquiryRow> for Inquiry {
    type Error = StoreError;

    fn try_from(row: InquiryRow) -> Result<Self, StoreError> {
        let status = InquiryStatus::parse(&row.status).ok_or_else(|| StoreError::Decode {
            field: "status",
            value: row.status.clone(),
        })?;
        Ok(Inquiry {
            id: row.id,
            property_id: row.property_id,
            sender_id: row.sender_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = inquiries)]
struct NewInquiryRow<'a> {
    property_id: i32,
    sender_id: &'a str,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    message: &'a str,
    status: &'a str,
    created_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = saved_properties)]
struct NewSavedRow<'a> {
    user_id: &'a str,
    property_id: i32,
    created_at: i64,
}

impl Store for PgStore {
    fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        let row = NewUserRow {
            id: &user.id,
            email: &user.email,
            first_name: &user.first_name,
            last_name: &user.last_name,
            password_hash: user.password_hash.as_deref(),
            role: user.role.as_str(),
            created_at: user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .get_result::<UserRow>(&mut self.conn)?
            .try_into()
    }

    fn find_user(&mut self, id: &str) -> Result<Option<User>, StoreError> {
        users::table
            .find(id)
            .first::<UserRow>(&mut self.conn)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn update_user_role(&mut self, id: &str, role: Role) -> Result<Option<User>, StoreError> {
        diesel::update(users::table.find(id))
            .set(users::role.eq(role.as_str()))
            .get_result::<UserRow>(&mut self.conn)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn delete_user(&mut self, id: &str) -> Result<bool, StoreError> {
        let deleted = diesel::delete(users::table.find(id)).execute(&mut self.conn)?;
        Ok(deleted > 0)
    }

    fn list_users(
        &mut self,
        search: &str,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<User>, i64), StoreError> {
        let pattern = format!("%{search}%");
        let total: i64 = users::table
            .filter(users::first_name.ilike(pattern.clone()))
            .count()
            .get_result(&mut self.conn)?;
        let rows = users::table
            .filter(users::first_name.ilike(pattern))
            .order(users::created_at.desc())
            .offset((page - 1) * per_page)
            .limit(per_page)
            .load::<UserRow>(&mut self.conn)?;
        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((users, total))
    }

    fn insert_property(&mut self, property: NewProperty) -> Result<Property, StoreError> {
        diesel::insert_into(properties::table)
            .values(NewPropertyRow::from(property))
            .get_result::<PropertyRow>(&mut self.conn)?
            .try_into()
    }

    fn find_property(&mut self, id: i32) -> Result<Option<Property>, StoreError> {
        properties::table
            .find(id)
            .first::<PropertyRow>(&mut self.conn)
            .optional()?
            .map(Property::try_from)
            .transpose()
    }

    fn update_property(
        &mut self,
        id: i32,
        changes: &PropertyChanges,
        updated_at: i64,
    ) -> Result<Option<Property>, StoreError> {
        diesel::update(properties::table.find(id))
            .set(&PropertyChangeset::new(changes, updated_at))
            .get_result::<PropertyRow>(&mut self.conn)
            .optional()?
            .map(Property::try_from)
            .transpose()
    }

    fn delete_property(&mut self, id: i32) -> Result<bool, StoreError> {
        let deleted = diesel::delete(properties::table.find(id)).execute(&mut self.conn)?;
        Ok(deleted > 0)
    }

    fn set_property_status(
        &mut self,
        id: i32,
        status: PropertyStatus,
        updated_at: i64,
    ) -> Result<Option<Property>, StoreError> {
        diesel::update(properties::table.find(id))
            .set((
                properties::status.eq(status.as_str()),
                properties::updated_at.eq(updated_at),
            ))
            .get_result::<PropertyRow>(&mut self.conn)
            .optional()?
            .map(Property::try_from)
            .transpose()
    }

    fn list_properties(&mut self, filter: &PropertyFilter) -> Result<Vec<Property>, StoreError> {
        let mut query = properties::table
            .order(properties::created_at.desc())
            .into_boxed();
        if let Some(search) = &filter.search {
            query = query.filter(properties::location.ilike(format!("%{search}%")));
        }
        if let Some(status) = filter.status {
            query = query.filter(properties::status.eq(status.as_str()));
        }
        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(properties::owner_id.eq(owner_id.clone()));
        }
        if filter.limit > 0 {
            query = query.limit(filter.limit);
        }
        let rows = query.load::<PropertyRow>(&mut self.conn)?;
        rows.into_iter().map(Property::try_from).collect()
    }

    fn insert_inquiry(&mut self, inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        let row = NewInquiryRow {
            property_id: inquiry.property_id,
            sender_id: &inquiry.sender_id,
            name: &inquiry.name,
            email: &inquiry.email,
            phone: inquiry.phone.as_deref(),
            message: &inquiry.message,
            status: inquiry.status.as_str(),
            created_at: inquiry.created_at,
        };
        diesel::insert_into(inquiries::table)
            .values(&row)
            .get_result::<InquiryRow>(&mut self.conn)?
            .try_into()
    }

    fn find_inquiry(&mut self, id: i32) -> Result<Option<Inquiry>, StoreError> {
        inquiries::table
            .find(id)
            .first::<InquiryRow>(&mut self.conn)
            .optional()?
            .map(Inquiry::try_from)
            .transpose()
    }

    fn set_inquiry_status(
        &mut self,
        id: i32,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>, StoreError> {
        diesel::update(inquiries::table.find(id))
            .set(inquiries::status.eq(status.as_str()))
            .get_result::<InquiryRow>(&mut self.conn)
            .optional()?
            .map(Inquiry::try_from)
            .transpose()
    }

    fn list_inquiries_for_property(
        &mut self,
        property_id: i32,
    ) -> Result<Vec<Inquiry>, StoreError> {
        let rows = inquiries::table
            .filter(inquiries::property_id.eq(property_id))
            .order(inquiries::created_at.desc())
            .load::<InquiryRow>(&mut self.conn)?;
        rows.into_iter().map(Inquiry::try_from).collect()
    }

    fn list_inquiries_for_sender(
        &mut self,
        sender_id: &str,
    ) -> Result<Vec<(Inquiry, PropertySummary)>, StoreError> {
        let rows = inquiries::table
            .inner_join(properties::table)
            .filter(inquiries::sender_id.eq(sender_id))
            .order(inquiries::created_at.desc())
            .select((
                inquiries::all_columns,
                (
                    properties::id,
                    properties::title,
                    properties::location,
                    properties::image_url,
                ),
            ))
            .load::<(InquiryRow, (i32, String, String, Option<String>))>(&mut self.conn)?;
        rows.into_iter()
            .map(|(inquiry, (id, title, location, image_url))| {
                Ok((
                    Inquiry::try_from(inquiry)?,
                    PropertySummary {
                        id,
                        title,
                        location,
                        image_url,
                    },
                ))
            })
            .collect()
    }

    fn save_property(&mut self, user_id: &str, property_id: i32) -> Result<(), StoreError> {
        let row = NewSavedRow {
            user_id,
            property_id,
            created_at: chrono::Utc::now().timestamp(),
        };
        diesel::insert_into(saved_properties::table)
            .values(&row)
            .on_conflict((saved_properties::user_id, saved_properties::property_id))
            .do_nothing()
            .execute(&mut self.conn)?;
        Ok(())
    }

    fn unsave_property(&mut self, user_id: &str, property_id: i32) -> Result<bool, StoreError> {
        let deleted = diesel::delete(
            saved_properties::table
                .filter(saved_properties::user_id.eq(user_id))
                .filter(saved_properties::property_id.eq(property_id)),
        )
        .execute(&mut self.conn)?;
        Ok(deleted > 0)
    }

    fn list_saved(&mut self, user_id: &str) -> Result<Vec<Property>, StoreError> {
        let rows = saved_properties::table
            .inner_join(properties::table)
            .filter(saved_properties::user_id.eq(user_id))
            .order(saved_properties::created_at.desc())
            .select(properties::all_columns)
            .load::<PropertyRow>(&mut self.conn)?;
        rows.into_iter().map(Property::try_from).collect()
    }
}
