use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::{debug, error};

/// Opens a fresh connection for the current request. Handlers are stateless;
/// there is no shared pool.
pub fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
    match PgConnection::establish(database_url) {
        Ok(conn) => {
            debug!("database connection established");
            Ok(conn)
        }
        Err(e) => {
            error!("failed to establish database connection: {e}");
            Err(e)
        }
    }
}
