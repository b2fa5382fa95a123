use std::env;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BOOKING_HORIZON_DAYS: i64 = 90;
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub port: u16,
    /// How far ahead of today a booking may be placed.
    pub booking_horizon_days: i64,
    pub token_ttl_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using insecure demo secret");
                    "demo-secret-do-not-use-in-production".to_string()
                }),
            port: env::var("PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            booking_horizon_days: env::var("BOOKING_HORIZON_DAYS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_BOOKING_HORIZON_DAYS),
            token_ttl_seconds: env::var("TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty() && self.booking_horizon_days > 0
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "demo-secret-do-not-use-in-production".to_string(),
            port: DEFAULT_PORT,
            booking_horizon_days: DEFAULT_BOOKING_HORIZON_DAYS,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}
