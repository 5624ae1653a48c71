//! Twitch login: `?action=login` builds the authorization URL,
//! `?action=callback&code=...` exchanges the code and looks up the user.

use serde::Serialize;
use serde_json::json;
use twitch_client::api::{TwitchApiClient, TwitchUser};
use twitch_client::auth::TwitchAuth;

use crate::config::{AppConfig, TwitchConfig};
use crate::envelope::{CorsPolicy, HttpMethod, RequestEnvelope, ResponseEnvelope};
use crate::error::{HandlerError, HandlerResult};

pub const CORS: CorsPolicy = CorsPolicy {
    allow_methods: "GET, POST, OPTIONS",
    allow_headers: "Content-Type, X-User-Id, X-Auth-Token",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Login,
    Callback,
}

impl Action {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("login") => Some(Action::Login),
            Some("callback") => Some(Action::Callback),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CallbackResponse {
    user: TwitchUser,
    access_token: String,
}

pub async fn handle(config: &AppConfig, request: &RequestEnvelope) -> ResponseEnvelope {
    if request.http_method == HttpMethod::Options {
        return ResponseEnvelope::preflight(&CORS);
    }
    route(config, request)
        .await
        .unwrap_or_else(HandlerError::into_response)
}

async fn route(config: &AppConfig, request: &RequestEnvelope) -> HandlerResult {
    if request.http_method != HttpMethod::Get {
        return Err(HandlerError::MethodNotAllowed);
    }
    match Action::parse(request.query("action")) {
        Some(Action::Login) => login(&config.twitch, request.query("state")),
        Some(Action::Callback) => {
            let code = request
                .query("code")
                .ok_or_else(|| HandlerError::bad_request("No authorization code provided"))?;
            callback(&config.twitch, code).await
        }
        None => Err(HandlerError::MethodNotAllowed),
    }
}

fn auth_client(twitch: &TwitchConfig) -> TwitchAuth {
    let auth = TwitchAuth::new(
        twitch.client_id.clone(),
        twitch.client_secret.clone(),
        twitch.redirect_uri.clone(),
    );
    match &twitch.token_url {
        Some(url) => auth.with_token_url(url.clone()),
        None => auth,
    }
}

fn api_client(twitch: &TwitchConfig) -> TwitchApiClient {
    let api = TwitchApiClient::new(twitch.client_id.clone());
    match &twitch.helix_base_url {
        Some(url) => api.with_base_url(url.clone()),
        None => api,
    }
}

fn login(twitch: &TwitchConfig, state: Option<&str>) -> HandlerResult {
    let auth_url = auth_client(twitch).get_auth_url(state)?;
    Ok(ResponseEnvelope::json(200, &json!({ "auth_url": auth_url })))
}

async fn callback(twitch: &TwitchConfig, code: &str) -> HandlerResult {
    let token = auth_client(twitch).exchange_code(code).await?;
    let user = api_client(twitch)
        .get_current_user(&token)
        .await?
        .unwrap_or_default();
    tracing::info!(user_id = user.id.as_deref().unwrap_or(""), "Twitch login completed");

    Ok(ResponseEnvelope::json(
        200,
        &CallbackResponse {
            user,
            access_token: token.access_token,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Form;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::Value;

    use super::*;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.twitch.client_id = "test-client".into();
        config.twitch.client_secret = "test-secret".into();
        // Any outbound call made by a test that must not make one fails fast.
        config.twitch.token_url = Some("http://127.0.0.1:9/token".into());
        config.twitch.helix_base_url = Some("http://127.0.0.1:9/helix".into());
        config
    }

    fn get_request(params: &[(&str, &str)]) -> RequestEnvelope {
        params
            .iter()
            .fold(RequestEnvelope::new(HttpMethod::Get), |req, (k, v)| {
                req.with_query(k, v)
            })
    }

    /// Serve a token endpoint and a Helix `/users` endpoint on loopback.
    async fn spawn_mock_twitch(users: Value) -> String {
        let app = Router::new()
            .route(
                "/token",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    let valid = form.get("code").map(String::as_str) == Some("good-code")
                        && form.get("grant_type").map(String::as_str)
                            == Some("authorization_code")
                        && form.get("client_secret").map(String::as_str) == Some("test-secret");
                    if valid {
                        (
                            StatusCode::OK,
                            Json(json!({
                                "access_token": "tok-123",
                                "refresh_token": "ref-456",
                                "expires_in": 14400,
                                "scope": ["user:read:email"],
                                "token_type": "bearer"
                            })),
                        )
                    } else {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"status": 400, "message": "Invalid authorization code"})),
                        )
                    }
                }),
            )
            .route(
                "/helix/users",
                get(move |headers: HeaderMap| {
                    let users = users.clone();
                    async move {
                        let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
                        let client = headers.get("client-id").and_then(|v| v.to_str().ok());
                        if bearer == Some("Bearer tok-123") && client == Some("test-client") {
                            (StatusCode::OK, Json(users))
                        } else {
                            (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad token"})))
                        }
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn mock_config(base: &str) -> AppConfig {
        let mut config = config();
        config.twitch.token_url = Some(format!("{base}/token"));
        config.twitch.helix_base_url = Some(format!("{base}/helix"));
        config
    }

    #[tokio::test]
    async fn login_returns_authorization_url() {
        let resp = handle(&config(), &get_request(&[("action", "login")])).await;
        assert_eq!(resp.status_code, 200);

        let url = resp.body_json().unwrap()["auth_url"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(url.starts_with("https://id.twitch.tv/oauth2/authorize?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5173%2Fauth%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=user%3Aread%3Aemail"));
        assert!(!url.contains("state="));
    }

    #[tokio::test]
    async fn action_defaults_to_login_and_forwards_state() {
        let resp = handle(&config(), &get_request(&[("state", "xyz")])).await;
        assert_eq!(resp.status_code, 200);
        let url = resp.body_json().unwrap()["auth_url"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(url.ends_with("state=xyz"));
    }

    #[tokio::test]
    async fn callback_without_code_is_bad_request() {
        for params in [vec![("action", "callback")], vec![("action", "callback"), ("code", "")]] {
            let resp = handle(&config(), &get_request(&params)).await;
            assert_eq!(resp.status_code, 400);
            assert_eq!(
                resp.body_json().unwrap()["error"],
                "No authorization code provided"
            );
        }
    }

    #[tokio::test]
    async fn unknown_action_and_methods_are_rejected() {
        let resp = handle(&config(), &get_request(&[("action", "logout")])).await;
        assert_eq!(resp.status_code, 405);

        for method in [HttpMethod::Post, HttpMethod::Put] {
            let request = RequestEnvelope::new(method).with_query("action", "login");
            assert_eq!(handle(&config(), &request).await.status_code, 405);
        }
    }

    #[tokio::test]
    async fn options_is_preflight() {
        let request = RequestEnvelope::new(HttpMethod::Options).with_query("action", "callback");
        let resp = handle(&config(), &request).await;
        assert_eq!(resp.status_code, 200);
        assert!(resp.body.is_empty());
        assert_eq!(
            resp.headers["Access-Control-Allow-Headers"],
            "Content-Type, X-User-Id, X-Auth-Token"
        );
    }

    #[tokio::test]
    async fn callback_returns_profile_and_token() {
        let base = spawn_mock_twitch(json!({"data": [{
            "id": "12345",
            "login": "alice",
            "display_name": "Alice",
            "email": "alice@example.com",
            "profile_image_url": "https://example.com/alice.png",
            "created_at": "2020-01-01T00:00:00Z",
            "broadcaster_type": ""
        }]}))
        .await;

        let request = get_request(&[("action", "callback"), ("code", "good-code")]);
        let resp = handle(&mock_config(&base), &request).await;
        assert_eq!(resp.status_code, 200, "{}", resp.body);
        assert_eq!(
            resp.body_json().unwrap(),
            json!({
                "user": {
                    "id": "12345",
                    "login": "alice",
                    "display_name": "Alice",
                    "email": "alice@example.com",
                    "profile_image_url": "https://example.com/alice.png",
                    "created_at": "2020-01-01T00:00:00Z"
                },
                "access_token": "tok-123"
            })
        );
    }

    #[tokio::test]
    async fn callback_with_empty_profile_list_has_null_user_fields() {
        let base = spawn_mock_twitch(json!({"data": []})).await;
        let request = get_request(&[("action", "callback"), ("code", "good-code")]);
        let body = handle(&mock_config(&base), &request)
            .await
            .body_json()
            .unwrap();

        assert_eq!(body["access_token"], "tok-123");
        for field in ["id", "login", "display_name", "email", "profile_image_url", "created_at"] {
            assert!(body["user"][field].is_null(), "{field}");
        }
    }

    #[tokio::test]
    async fn rejected_code_is_500_with_upstream_text() {
        let base = spawn_mock_twitch(json!({"data": []})).await;
        let request = get_request(&[("action", "callback"), ("code", "bad-code")]);
        let resp = handle(&mock_config(&base), &request).await;
        assert_eq!(resp.status_code, 500);
        assert_eq!(
            resp.body_json().unwrap()["error"],
            "Token exchange failed: 400: Invalid authorization code"
        );
    }

    #[tokio::test]
    async fn unreachable_provider_is_500() {
        let request = get_request(&[("action", "callback"), ("code", "good-code")]);
        let resp = handle(&config(), &request).await;
        assert_eq!(resp.status_code, 500);
        assert!(
            resp.body_json().unwrap()["error"]
                .as_str()
                .unwrap()
                .starts_with("HTTP request failed")
        );
    }
}
