use dotenv::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub email_from: String,
    pub imagekit_private_key: String,
    pub imagekit_upload_url: String,
    /// Base URL used when building links embedded in notification mails.
    pub site_base_url: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv().ok(); // Load .env file if present
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            port: env::var("PORT")?.parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            smtp_host: env::var("SMTP_HOST")?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()?,
            smtp_user: env::var("SMTP_USER")?,
            smtp_pass: env::var("SMTP_PASS")?,
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "\"Listings\" <noreply@listings.local>".to_string()),
            imagekit_private_key: env::var("IMAGEKIT_PRIVATE_KEY")?,
            imagekit_upload_url: env::var("IMAGEKIT_UPLOAD_URL")
                .unwrap_or_else(|_| "https://upload.imagekit.io/api/v1/files/upload".to_string()),
            site_base_url: env::var("SITE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}
