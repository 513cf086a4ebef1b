use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin: AdminSeed,
    pub session: SessionSettings,
    pub static_dir: Option<String>,
}

/// Credentials for the single admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: Option<String>,
    pub full_name: String,
    pub email: String,
}

/// Upper bound for `SESSION_TTL_HOURS`; larger values are clamped to one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub ttl_hours: i64,
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            secure_cookie: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let admin = AdminSeed {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            full_name: env::var("ADMIN_FULL_NAME")
                .unwrap_or_else(|_| "Store Administrator".to_string()),
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@store.com".to_string()),
        };

        let defaults = SessionSettings::default();
        let session = SessionSettings {
            ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|h| parse_ttl_hours(&h))
                .unwrap_or(defaults.ttl_hours),
            secure_cookie: env::var("SESSION_COOKIE_SECURE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.secure_cookie),
        };

        let static_dir = env::var("STATIC_DIR").ok().filter(|d| !d.is_empty());

        Ok(Self {
            port,
            database_url,
            host,
            admin,
            session,
            static_dir,
        })
    }
}

/// Positive hour counts only, clamped to [`MAX_SESSION_TTL_HOURS`].
pub fn parse_ttl_hours(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|h| *h > 0)
        .map(|h| h.min(MAX_SESSION_TTL_HOURS))
}
