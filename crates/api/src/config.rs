use cohort_core::interview::HolidayCalendar;
use cohort_documents::Letterhead;
use cohort_events::outbox::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Dates on which interviews cannot be booked.
    pub holidays: HolidayCalendar,
    /// Email outbox retry settings.
    pub outbox: OutboxConfig,
    /// Letterhead printed on generated documents.
    pub letterhead: Letterhead,
    /// First admin account created at startup, if configured.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Email outbox dispatcher settings.
#[derive(Debug, Clone)]
pub struct OutboxConfig {
    /// Seconds between background dispatch passes.
    pub poll_secs: u64,
    /// Delivery attempts before an entry is no longer retried automatically.
    pub max_attempts: i32,
}

/// Credentials for the admin account seeded when no admin exists.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

const DEFAULT_ORGANISATION_NAME: &str = "Internship Programme Office";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                        |
    /// |----------------------------|--------------------------------|
    /// | `HOST`                     | `0.0.0.0`                      |
    /// | `PORT`                     | `3000`                         |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                           |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                           |
    /// | `INTERVIEW_HOLIDAYS`       | empty (annual holidays only)   |
    /// | `OUTBOX_POLL_SECS`         | `30`                           |
    /// | `OUTBOX_MAX_ATTEMPTS`      | `5`                            |
    /// | `ORGANISATION_NAME`        | `Internship Programme Office`  |
    /// | `ORGANISATION_ADDRESS`     | empty                          |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | unset                          |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                          |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let extra_holidays = std::env::var("INTERVIEW_HOLIDAYS").unwrap_or_default();
        let holidays = HolidayCalendar::standard().with_dates(
            HolidayCalendar::parse_dates(&extra_holidays)
                .unwrap_or_else(|e| panic!("INTERVIEW_HOLIDAYS: {e}")),
        );

        let outbox = OutboxConfig {
            poll_secs: std::env::var("OUTBOX_POLL_SECS")
                .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL.as_secs().to_string())
                .parse()
                .expect("OUTBOX_POLL_SECS must be a valid u64"),
            max_attempts: std::env::var("OUTBOX_MAX_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
                .parse()
                .expect("OUTBOX_MAX_ATTEMPTS must be a valid i32"),
        };

        let letterhead = Letterhead {
            organisation_name: std::env::var("ORGANISATION_NAME")
                .unwrap_or_else(|_| DEFAULT_ORGANISATION_NAME.into()),
            organisation_address: std::env::var("ORGANISATION_ADDRESS").unwrap_or_default(),
        };

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            holidays,
            outbox,
            letterhead,
            bootstrap_admin,
        }
    }
}
