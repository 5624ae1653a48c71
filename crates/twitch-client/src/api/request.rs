use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::*;

impl TwitchApiClient {
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            base_url: HELIX_BASE.to_string(),
        }
    }

    /// Point requests at another Helix base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build auth headers from the given token.
    fn auth_headers(&self, token: &Token) -> Result<HeaderMap, TwitchError> {
        let invalid = |what: &str| TwitchError::ApiError {
            status: 400,
            message: format!("{what} is not a valid header value"),
        };
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", token.access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|_| invalid("access token"))?,
        );
        headers.insert(
            "Client-Id",
            HeaderValue::from_str(&self.client_id).map_err(|_| invalid("client id"))?,
        );
        Ok(headers)
    }

    /// Execute a GET request with auth headers.
    pub(super) async fn authenticated_get(
        &self,
        url: &str,
        token: &Token,
    ) -> Result<String, TwitchError> {
        let headers = self.auth_headers(token)?;
        let resp = self.http.get(url).headers(headers).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Helix request failed");
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
