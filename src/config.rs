use std::env;

/// Startup configuration read from the environment (`.env` supported via
/// dotenvy). A missing secret is an unrecoverable startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set!")?;
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| format!("Invalid PORT: {raw}"))?,
            Err(_) => 8080,
        };
        Ok(Self { jwt_secret, port })
    }
}
