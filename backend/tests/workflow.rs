//! End-to-end approval workflow over the in-memory store: submission enters
//! review, the admin queue surfaces it, approval makes it publicly visible,
//! and the ordered feature lists survive the round trip.

use listings_backend::approval::{self, SubmitProperty};
use listings_backend::auth::Identity;
use listings_backend::inquiry::{self, CreateInquiry};
use listings_backend::models::{InquiryStatus, NewUser, PropertyStatus, Role};
use listings_backend::property::{self, ListParams};
use listings_backend::saved;
use listings_backend::store::mem::MemStore;
use listings_backend::store::Store;

fn seed_user(store: &mut MemStore, id: &str, first_name: &str, role: Role) -> Identity {
    store
        .insert_user(NewUser {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            first_name: first_name.to_string(),
            last_name: "Test".to_string(),
            password_hash: None,
            role,
            created_at: 0,
        })
        .unwrap();
    Identity {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        role,
    }
}

#[test]
fn pending_listing_becomes_publicly_visible_after_approval() {
    let mut store = MemStore::new();
    let user_a = seed_user(&mut store, "user-a", "Alice", Role::User);
    let admin = seed_user(&mut store, "admin-1", "Admin", Role::Admin);

    // User A creates property P; it enters review no matter what was sent.
    let submitted = approval::submit(
        &mut store,
        &user_a,
        &SubmitProperty {
            title: "Beachfront Paradise".into(),
            price: Some(3_800_000),
            location: "Miami, FL".into(),
            outdoor_amenities: vec!["Pool".into(), "Spa".into()],
            status: Some("approved".into()),
            ..SubmitProperty::default()
        },
    )
    .unwrap();
    assert_eq!(submitted.status, PropertyStatus::Pending);

    // Anonymous public listing does not include it yet.
    let public = property::listing(&mut store, None, &ListParams::default()).unwrap();
    assert!(public.iter().all(|p| p.id != submitted.id));

    // The admin review queue sees P.
    let queue = approval::list_by_status(&mut store, Some(&admin), "pending").unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, submitted.id);

    // Admin approves P.
    let approved = approval::set_status(&mut store, &admin, submitted.id, "approved").unwrap();
    assert_eq!(approved.status, PropertyStatus::Approved);

    // Anonymous public listing now includes P.
    let public = property::listing(&mut store, None, &ListParams::default()).unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, submitted.id);

    // Ordered feature lists came back exactly as submitted.
    assert_eq!(public[0].outdoor_amenities, vec!["Pool", "Spa"]);
}

#[test]
fn inquiry_flow_between_buyer_and_owner() {
    let mut store = MemStore::new();
    let owner = seed_user(&mut store, "owner-1", "Olivia", Role::User);
    let buyer = seed_user(&mut store, "buyer-1", "Ben", Role::User);
    let admin = seed_user(&mut store, "admin-1", "Admin", Role::Admin);

    let listing = approval::submit(
        &mut store,
        &owner,
        &SubmitProperty {
            title: "Charming Suburban Home".into(),
            price: Some(650_000),
            location: "Austin, TX".into(),
            ..SubmitProperty::default()
        },
    )
    .unwrap();
    approval::set_status(&mut store, &admin, listing.id, "approved").unwrap();

    let (sent, _, _) = inquiry::create(
        &mut store,
        &buyer,
        &CreateInquiry {
            property_id: Some(listing.id),
            name: "Ben Buyer".into(),
            email: "ben@example.com".into(),
            phone: None,
            message: "I would like to make an offer.".into(),
        },
    )
    .unwrap();
    assert_eq!(sent.status, InquiryStatus::Unread);

    // The buyer sees it in their sent list with the property summary...
    let sent_list = inquiry::list_for_sender(&mut store, &buyer).unwrap();
    assert_eq!(sent_list.len(), 1);
    assert_eq!(sent_list[0].property.title, "Charming Suburban Home");

    // ...but cannot read the owner-scoped inbox for the property.
    assert!(inquiry::list_for_property(&mut store, &buyer, listing.id).is_err());

    // The owner reads and marks it.
    let inbox = inquiry::list_for_property(&mut store, &owner, listing.id).unwrap();
    assert_eq!(inbox.len(), 1);
    let marked = inquiry::update_status(&mut store, &owner, sent.id, "read").unwrap();
    assert_eq!(marked.status, InquiryStatus::Read);
}

#[test]
fn deleting_a_listing_clears_saved_relations() {
    let mut store = MemStore::new();
    let owner = seed_user(&mut store, "owner-1", "Olivia", Role::User);
    let fan = seed_user(&mut store, "fan-1", "Fay", Role::User);

    let listing = approval::submit(
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

    saved::save(&mut store, &fan, listing.id).unwrap();
    assert_eq!(saved::list_for_user(&mut store, &fan).unwrap().len(), 1);

    // Owner deletes the property; the saved relation goes with it.
    property::remove(&mut store, &owner, listing.id).unwrap();
    assert!(saved::list_for_user(&mut store, &fan).unwrap().is_empty());
}
