//! Cross-origin policy applied in front of every route.
//!
//! CORS is enforced by browsers: for an origin outside the allow-list the gate
//! leaves out every `Access-Control-Allow-*` header and lets the request through.
//! Preflight `OPTIONS` requests are answered here and never reach a handler.
//! Rejecting foreign origins on the server is a separate opt-in, see
//! [`enforce_origin`].

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tower_http::cors::{AllowCredentials, AllowOrigin, CorsLayer};

use crate::error::ApiError;

pub const DEV_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<Method>,
    pub allowed_headers: Vec<HeaderName>,
    pub allow_credentials: bool,
    // 403 for foreign origins instead of only withholding the headers
    pub enforce_origin: bool,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        CorsPolicy::with_origins(vec![DEV_ORIGIN.to_string()])
    }
}

impl CorsPolicy {
    pub fn with_origins(allowed_origins: Vec<String>) -> Self {
        CorsPolicy {
            allowed_origins,
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::OPTIONS,
                Method::DELETE,
                Method::PUT,
            ],
            allowed_headers: vec![header::CONTENT_TYPE, header::AUTHORIZATION],
            allow_credentials: true,
            enforce_origin: false,
        }
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    pub fn layer(&self) -> CorsLayer {
        // Wildcards and origins that are not valid header values can never
        // match a credentialed request.
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) if !origin.contains('*') => Some(value),
                _ => {
                    log::warn!("Ignoring unusable CORS origin {:?}", origin);
                    None
                }
            })
            .collect();

        let credentials = if self.allow_credentials {
            let allowed = origins.clone();
            AllowCredentials::predicate(move |origin: &HeaderValue, _| allowed.contains(origin))
        } else {
            AllowCredentials::from(false)
        };

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(self.allowed_methods.clone())
            .allow_headers(self.allowed_headers.clone())
            .allow_credentials(credentials)
    }
}

/// Wraps `router` so every route shares the same cross-origin policy.
///
/// The CORS layer sits outside origin enforcement so preflights are answered
/// before enforcement or any handler runs.
pub fn apply(router: Router, policy: &CorsPolicy) -> Router {
    let router = if policy.enforce_origin {
        router.layer(middleware::from_fn_with_state(
            Arc::new(policy.clone()),
            enforce_origin,
        ))
    } else {
        router
    };
    router
        .layer(policy.layer())
        .layer(middleware::map_response(strip_foreign_allow_lists))
}

// tower-http sends the method and header lists on every preflight; a foreign
// origin gets no `Access-Control-Allow-*` header at all.
async fn strip_foreign_allow_lists(mut response: Response) -> Response {
    let headers = response.headers_mut();
    if !headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        headers.remove(header::ACCESS_CONTROL_ALLOW_METHODS);
        headers.remove(header::ACCESS_CONTROL_ALLOW_HEADERS);
        headers.remove(header::ACCESS_CONTROL_ALLOW_CREDENTIALS);
    }
    response
}

/// Rejects requests whose `Origin` header is present and not allowed.
/// Requests without `Origin` pass.
pub async fn enforce_origin(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = String::from_utf8_lossy(origin.as_bytes()).into_owned();
        if !policy.is_origin_allowed(&origin) {
            log::warn!("Rejecting {} {} from origin {}", request.method(), request.uri(), origin);
            return Err(ApiError::ForbiddenOrigin(origin));
        }
    }
    Ok(next.run(request).await)
}
