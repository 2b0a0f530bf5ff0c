use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use jjmgmt_auth::{auth_routes, AuthState};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{health::health, root::root};

/// Create the application router with all routes and middleware.
pub fn create_app(auth_state: AuthState, cors_origin: HeaderValue) -> Router {
    // The mobile web build is the only browser origin
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes().with_state(auth_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use jjmgmt_auth::{
        mock_idp::{id_token_claims, MockIdp, PRIMARY_KEY},
        AuthConfig, GoogleConfig, SessionConfig,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:8081";
    const CLIENT_ID: &str = "client.apps.googleusercontent.com";

    fn test_app(config: &AuthConfig) -> Router {
        let state = AuthState::new(config).unwrap();
        create_app(state, HeaderValue::from_static(ORIGIN))
    }

    fn default_app() -> Router {
        test_app(&AuthConfig::default())
    }

    async fn body_json(response: Response<Body>) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_reports_service_status() {
        let response = default_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json,
            json!({ "service": "jj-mgmt-api", "status": "running" })
        );
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = default_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["service"], "jj-mgmt-api");

        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let response = default_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, ORIGIN)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static(ORIGIN))
        );
    }

    #[tokio::test]
    async fn test_google_rejects_invalid_payload() {
        let response = default_app()
            .oneshot(post_json("/auth/social/google", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid payload");
    }

    #[tokio::test]
    async fn test_apple_rejects_invalid_payload() {
        let response = default_app()
            .oneshot(post_json("/auth/social/apple", json!({ "idToken": "" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid payload");
    }

    #[tokio::test]
    async fn test_apple_without_audience_config_is_500() {
        let response = default_app()
            .oneshot(post_json(
                "/auth/social/apple",
                json!({ "idToken": "sample-id-token" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Server configuration error");
    }

    #[tokio::test]
    async fn test_unknown_provider_is_404() {
        let response = default_app()
            .oneshot(post_json(
                "/auth/social/github",
                json!({ "idToken": "sample-id-token" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Unknown provider");
    }

    #[tokio::test]
    async fn test_me_rejects_missing_bearer() {
        let response = default_app()
            .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing bearer token");
    }

    #[tokio::test]
    async fn test_sign_in_then_me() {
        let idp = MockIdp::start().await.unwrap();
        idp.register_access_token(
            "valid-token",
            json!({ "sub": "g-1", "email": "a@b.com", "email_verified": "true" }),
        )
        .await;

        let config = AuthConfig {
            google: GoogleConfig {
                client_ids: vec![CLIENT_ID.to_string()],
                certs_url: idp.jwks_url(),
                userinfo_url: idp.userinfo_url(),
                ..GoogleConfig::default()
            },
            session: SessionConfig {
                secret: Some("test-secret".to_string()),
            },
            ..AuthConfig::default()
        };
        let app = test_app(&config);

        // Access-token path
        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/social/google",
                json!({ "accessToken": "valid-token" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["user"],
            json!({
                "provider": "google",
                "providerUserId": "g-1",
                "email": "a@b.com",
                "emailVerified": true,
            })
        );
        let token = json["token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user"]["providerUserId"], "g-1");
        assert_eq!(json["user"]["role"], "student");

        // ID-token path through the same app
        let claims = id_token_claims("https://accounts.google.com", CLIENT_ID, "g-2");
        let id_token = PRIMARY_KEY.sign(&claims).unwrap();
        let response = app
            .oneshot(post_json(
                "/auth/social/google",
                json!({ "idToken": id_token }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user"]["providerUserId"], "g-2");
    }
}
