//! Seeds a development database with demo accounts and listings.
//!
//! Accounts are created without password hashes; sessions are minted
//! externally (see `auth::create_token`).

use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use listings_backend::config::AppConfig;
use listings_backend::models::{NewProperty, NewUser, PropertyStatus, Role};
use listings_backend::store::pg::PgStore;
use listings_backend::store::Store;

fn new_user(email: &str, first_name: &str, last_name: &str, role: Role, now: i64) -> NewUser {
    NewUser {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password_hash: None,
        role,
        created_at: now,
    }
}

fn listing(
    title: &str,
    price: i64,
    location: &str,
    owner_id: &str,
    status: PropertyStatus,
    now: i64,
) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        description: format!("{title} in {location}."),
        details: String::new(),
        price,
        location: location.to_string(),
        image_url: None,
        bedrooms: 3,
        bathrooms: 2,
        sqft: 2200,
        year_built: Some(2018),
        property_type: Some("Single Family".to_string()),
        is_for_sale: true,
        rooms: vec!["Living Room".into(), "Dining Room".into(), "Kitchen".into()],
        indoor_features: vec!["Walk-in Closet".into(), "High Ceilings".into()],
        outdoor_amenities: vec!["Pool".into(), "Spa".into()],
        view: vec!["City".into()],
        status,
        owner_id: owner_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let mut store = PgStore::connect(&config.database_url)?;
    let now = chrono::Utc::now().timestamp();

    let admin = store.insert_user(new_user("admin@example.com", "Admin", "User", Role::Admin, now))?;
    let john = store.insert_user(new_user("john.doe@example.com", "John", "Doe", Role::User, now))?;
    let jane = store.insert_user(new_user("jane.smith@example.com", "Jane", "Smith", Role::User, now))?;
    info!("created admin {} and users {}, {}", admin.email, john.email, jane.email);

    for property in [
        listing("Luxury Modern Villa", 2_500_000, "Malibu, CA", &john.id, PropertyStatus::Approved, now),
        listing("Downtown Luxury Condo", 1_200_000, "New York, NY", &jane.id, PropertyStatus::Approved, now),
        listing("Newly Listed Downtown Loft", 750_000, "Seattle, WA", &jane.id, PropertyStatus::Pending, now),
    ] {
        let created = store.insert_property(property)?;
        info!("created property {} ({})", created.title, created.status);
    }

    info!("database seeding completed");
    Ok(())
}
