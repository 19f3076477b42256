//! Per-request authorization: the predicate family used by the domain
//! operations, plus the static route-class table checked once per request.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{bearer_identity, Identity};
use crate::error::ApiError;
use crate::models::Role;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    User,
    Admin,
}

/// Path-prefix to route-class table; first match wins. Anything not listed
/// is public.
const ROUTE_CLASSES: &[(&str, RouteClass)] = &[
    ("/admin", RouteClass::Admin),
    ("/users", RouteClass::Admin),
    ("/user/", RouteClass::Admin),
    ("/inquiries", RouteClass::User),
    ("/saved", RouteClass::User),
    ("/upload-image", RouteClass::User),
    ("/properties", RouteClass::User),
];

pub fn route_class(method: &Method, path: &str) -> RouteClass {
    // Listing reads are public; every other /properties method is gated.
    if method == Method::GET && (path == "/properties" || path.starts_with("/properties/")) {
        return RouteClass::Public;
    }
    for (prefix, class) in ROUTE_CLASSES {
        if path.starts_with(prefix) {
            return *class;
        }
    }
    RouteClass::Public
}

pub fn require_authenticated(identity: Option<&Identity>) -> Result<&Identity, ApiError> {
    identity.ok_or_else(ApiError::unauthorized)
}

pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn require_owner_or_admin(identity: &Identity, owner_id: &str) -> Result<(), ApiError> {
    if identity.id == owner_id || identity.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Resolves the session once per request, stores the identity for handler
/// extractors, and applies the route-class gate. Unauthorized responses name
/// the login entry point with the attempted path preserved as the callback
/// target.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = bearer_identity(request.headers(), &state.config.jwt_secret);
    let path = request.uri().path().to_string();

    match route_class(request.method(), &path) {
        RouteClass::Public => {}
        RouteClass::User => {
            if identity.is_none() {
                return Err(ApiError::login_required(&path));
            }
        }
        RouteClass::Admin => match &identity {
            None => return Err(ApiError::login_required(&path)),
            Some(identity) => require_role(identity, &[Role::Admin])?,
        },
    }

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }
    Ok(next.run(request).await)
}
