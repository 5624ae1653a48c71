//! Configuration value validation.

use url::Url;

/// The database URL must name a file.
pub fn validate_database_url(value: &str) -> Result<(), String> {
    event_db::database_path(value)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// The redirect URI must be an absolute http(s) URL.
pub fn validate_redirect_uri(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}
