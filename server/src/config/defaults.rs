//! Default values for settings that are not supplied.

pub const DATABASE_URL: &str = "sqlite://event-registration.db";
pub const REDIRECT_URI: &str = "http://localhost:5173/auth/callback";
pub const SERVER_PORT: u16 = 8080;
