//! Route middleware gating protected handlers behind a bearer credential.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AuthError, AuthState, Authenticated};

/// Admits the request only if it carries a valid bearer credential.
///
/// Use with `axum::middleware::from_fn_with_state`. The verified claims are
/// stored in the request extensions as [`Authenticated`].
pub async fn require_bearer(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = request.into_parts();
    let authenticated = Authenticated::from_request_parts(&mut parts, &auth).await?;

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(authenticated);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, HeaderValue, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use liftlog_core::envelope::ApiMessage;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::AuthConfig;

    const SECRET: &str = "missionimpossible";

    fn app() -> Router {
        let auth = AuthState::new(AuthConfig::new(SECRET));

        Router::new()
            .route(
                "/protected",
                get(|Extension(Authenticated(claims)): Extension<Authenticated>| async move {
                    claims["name"].as_str().unwrap_or_default().to_string()
                }),
            )
            .route_layer(from_fn_with_state(auth, require_bearer))
    }

    fn token(secret: &str) -> String {
        encode(
            &Header::default(),
            &json!({"name": "Ethan Hunt", "team": "IMF"}),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn call(header: Option<HeaderValue>) -> (StatusCode, String) {
        let mut request = Request::builder().uri("/protected");
        if let Some(value) = header {
            request = request.header(AUTHORIZATION, value);
        }

        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_is_admitted_with_claims() {
        let header = HeaderValue::from_str(&format!("Bearer {}", token(SECRET))).unwrap();
        let (status, body) = call(Some(header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Ethan Hunt");
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let (status, body) = call(None).await;
        let message: ApiMessage = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message.message, "not authorized");
        assert_eq!(message.error, "missing authorization header");
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_401() {
        let header = HeaderValue::from_str(&format!("Basic {}", token(SECRET))).unwrap();
        let (status, body) = call(Some(header)).await;
        let message: ApiMessage = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message.error, "malformed authorization header");
    }

    #[tokio::test]
    async fn test_non_utf8_header_is_malformed() {
        let header = HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap();
        let (status, body) = call(Some(header)).await;
        let message: ApiMessage = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message.error, "malformed authorization header");
    }

    #[tokio::test]
    async fn test_foreign_secret_is_401() {
        let header = HeaderValue::from_str(&format!("Bearer {}", token("other"))).unwrap();
        let (status, body) = call(Some(header)).await;
        let message: ApiMessage = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message.error, "invalid bearer credential");
    }
}
