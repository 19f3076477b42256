use std::net::SocketAddr;
use std::sync::Arc;

use diesel::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use listings_backend::config::AppConfig;
use listings_backend::images::{ImageHost, ImageKitClient};
use listings_backend::mail::{Mailer, SmtpMailer};
use listings_backend::{db, router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    // Fail fast when the database is unreachable.
    let mut conn = db::establish_connection(&config.database_url)?;
    let test_query: i32 =
        diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1")).get_result(&mut conn)?;
    info!("database test query result: {test_query}");
    drop(conn);

    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::from_config(&config)?);
    let images: Arc<dyn ImageHost> = Arc::new(ImageKitClient::new(
        &config.imagekit_upload_url,
        &config.imagekit_private_key,
    ));

    info!("starting server on {addr}");
    let state = AppState {
        config,
        mailer,
        images,
    };
    let app = router(state);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
