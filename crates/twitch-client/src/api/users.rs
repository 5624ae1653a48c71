use super::*;

impl TwitchApiClient {
    /// Get the user the token belongs to.
    ///
    /// Returns `Ok(None)` when Helix answers with an empty `data` list.
    pub async fn get_current_user(&self, token: &Token) -> Result<Option<TwitchUser>, TwitchError> {
        let url = format!("{}/users", self.base_url);
        let body = self.authenticated_get(&url, token).await?;
        first_user(&body)
    }
}

fn first_user(body: &str) -> Result<Option<TwitchUser>, TwitchError> {
    let resp: HelixResponse<TwitchUser> = serde_json::from_str(body)?;
    Ok(resp.data.into_iter().next())
}
