//! HTML bodies for the two inquiry notification mails.

use crate::models::{Inquiry, Property, User};

fn phone_line(phone: Option<&str>) -> String {
    match phone {
        Some(phone) => format!("<p><strong>Phone:</strong> {phone}</p>"),
        None => String::new(),
    }
}

/// Mail to the property owner when an inquiry arrives. Returns
/// `(subject, html)`.
pub fn owner_notification(
    owner: &User,
    property: &Property,
    inquiry: &Inquiry,
    dashboard_url: &str,
) -> (String, String) {
    let subject = format!("New Inquiry for {}", property.title);
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; color: #333;">
  <h1 style="color: #3b82f6;">New Property Inquiry</h1>
  <p>Hello {owner_name},</p>
  <p>You have received a new inquiry about <strong>{title}</strong>.</p>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px;">
    <p><strong>From:</strong> {name} &lt;{email}&gt;</p>
    {phone}
    <p>{message}</p>
  </div>
  <p><a href="{dashboard_url}" style="background: #3b82f6; color: white; padding: 12px 25px; border-radius: 5px; text-decoration: none;">View in dashboard</a></p>
</body>
</html>"#,
        owner_name = owner.full_name(),
        title = property.title,
        name = inquiry.name,
        email = inquiry.email,
        phone = phone_line(inquiry.phone.as_deref()),
        message = inquiry.message,
    );
    (subject, html)
}

/// Confirmation mail back to the inquirer. Returns `(subject, html)`.
pub fn inquiry_confirmation(
    property: &Property,
    inquiry: &Inquiry,
    property_url: &str,
) -> (String, String) {
    let subject = format!("Inquiry Confirmation - {}", property.title);
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; color: #333;">
  <h1 style="color: #3b82f6;">Thanks for your inquiry, {name}!</h1>
  <p>We passed your message on to the owner of <strong>{title}</strong> in {location}.</p>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px;">
    <p><strong>Listed at:</strong> ${price}</p>
    <p>{message}</p>
  </div>
  <p><a href="{property_url}" style="background: #3b82f6; color: white; padding: 12px 25px; border-radius: 5px; text-decoration: none;">View the property</a></p>
</body>
</html>"#,
        name = inquiry.name,
        title = property.title,
        location = property.location,
        price = property.price,
        message = inquiry.message,
    );
    (subject, html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InquiryStatus, PropertyStatus, Role};

    fn fixtures() -> (User, Property, Inquiry) {
        let owner = User {
            id: "owner-1".into(),
            email: "owner@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            password_hash: None,
            role: Role::User,
            created_at: 0,
        };
        let property = Property {
            id: 7,
            title: "Luxury Modern Villa".into(),
            description: String::new(),
            details: String::new(),
            price: 2_500_000,
            location: "Malibu, CA".into(),
            image_url: None,
            bedrooms: 5,
            bathrooms: 4,
            sqft: 4500,
            year_built: Some(2020),
            property_type: None,
            is_for_sale: true,
            rooms: vec![],
            indoor_features: vec![],
            outdoor_amenities: vec![],
            view: vec![],
            status: PropertyStatus::Approved,
            owner_id: "owner-1".into(),
            created_at: 0,
            updated_at: 0,
        };
        let inquiry = Inquiry {
            id: 1,
            property_id: 7,
            sender_id: "sender-1".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: Some("555-0101".into()),
            message: "Could we schedule a viewing?".into(),
            status: InquiryStatus::Unread,
            created_at: 0,
        };
        (owner, property, inquiry)
    }

    #[test]
    fn owner_notification_carries_inquiry_details() {
        let (owner, property, inquiry) = fixtures();
        let (subject, html) = owner_notification(&owner, &property, &inquiry, "http://x/dash");
        assert_eq!(subject, "New Inquiry for Luxury Modern Villa");
        assert!(html.contains("Jane Smith"));
        assert!(html.contains("john@example.com"));
        assert!(html.contains("555-0101"));
        assert!(html.contains("http://x/dash"));
    }

    #[test]
    fn confirmation_omits_phone_when_absent() {
        let (_, property, mut inquiry) = fixtures();
        inquiry.phone = None;
        let (subject, html) = inquiry_confirmation(&property, &inquiry, "http://x/p/7");
        assert_eq!(subject, "Inquiry Confirmation - Luxury Modern Villa");
        assert!(html.contains("Malibu, CA"));
        assert!(!html.contains("Phone:"));
    }
}
