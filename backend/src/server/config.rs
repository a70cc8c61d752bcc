//! Startup configuration.
//!
//! [`AppSettings`] is loaded by OrthoConfig from CLI flags, `WARDEN_*`
//! environment variables and configuration files. [`ServerConfig`] is the
//! validated form the server is built from.

use std::fmt;
use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;

use warden::domain::{RegistrationDetails, RegistrationValidationError};
use warden::outbound::persistence::DbPool;
use warden::outbound::security::{JwtAlgorithm, JwtConfigError, MIN_SECRET_LEN};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Raw settings as supplied by the operator.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WARDEN")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// HMAC signing secret, at least 32 bytes.
    pub jwt_secret: Option<String>,
    /// `HS256`, `HS384` or `HS512`.
    pub jwt_algorithm: Option<String>,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: Option<i64>,
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Permit a random per-process signing secret outside debug builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("admin_username", &self.admin_username)
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .field("allow_ephemeral_secret", &self.allow_ephemeral_secret)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// Reasons a configuration cannot start the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error("token_ttl_minutes must be greater than zero, got {0}")]
    TokenTtl(i64),
    #[error(transparent)]
    Jwt(#[from] JwtConfigError),
    #[error("jwt_secret is required outside debug builds unless allow_ephemeral_secret is set")]
    MissingSecret,
    #[error("admin_username, admin_email and admin_password must be set together")]
    PartialAdmin,
    #[error("invalid bootstrap admin: {0}")]
    InvalidAdmin(#[from] RegistrationValidationError),
}

/// Validated server configuration.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Vec<u8>,
    pub(crate) jwt_algorithm: JwtAlgorithm,
    pub(crate) token_ttl: Duration,
    pub(crate) bootstrap_admin: Option<RegistrationDetails>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Validate `settings`. `ephemeral_allowed` permits a generated secret
    /// when none is configured.
    pub fn from_settings(
        settings: &AppSettings,
        ephemeral_allowed: bool,
    ) -> Result<Self, ConfigError> {
        let raw_addr = settings.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::BindAddr {
                value: raw_addr.to_owned(),
                message: err.to_string(),
            })?;

        let ttl_minutes = settings
            .token_ttl_minutes
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if ttl_minutes <= 0 {
            return Err(ConfigError::TokenTtl(ttl_minutes));
        }

        let jwt_algorithm = settings
            .jwt_algorithm
            .as_deref()
            .map(str::parse::<JwtAlgorithm>)
            .transpose()?
            .unwrap_or_default();

        let jwt_secret = resolve_secret(
            settings.jwt_secret.as_deref(),
            ephemeral_allowed || settings.allow_ephemeral_secret,
        )?;

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_algorithm,
            token_ttl: Duration::minutes(ttl_minutes),
            bootstrap_admin: bootstrap_admin(settings)?,
            db_pool: None,
        })
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn resolve_secret(configured: Option<&str>, ephemeral_allowed: bool) -> Result<Vec<u8>, ConfigError> {
    match configured {
        Some(secret) if secret.len() < MIN_SECRET_LEN => Err(JwtConfigError::SecretTooShort {
            min: MIN_SECRET_LEN,
        }
        .into()),
        Some(secret) => Ok(secret.as_bytes().to_vec()),
        None if ephemeral_allowed => {
            warn!("no jwt_secret configured; tokens will not survive a restart");
            let mut bytes = [0_u8; EPHEMERAL_SECRET_BYTES];
            OsRng.fill_bytes(&mut bytes);
            Ok(hex::encode(bytes).into_bytes())
        }
        None => Err(ConfigError::MissingSecret),
    }
}

fn bootstrap_admin(settings: &AppSettings) -> Result<Option<RegistrationDetails>, ConfigError> {
    match (
        settings.admin_username.as_deref(),
        settings.admin_email.as_deref(),
        settings.admin_password.as_deref(),
    ) {
        (None, None, None) => Ok(None),
        (Some(username), Some(email), Some(password)) => Ok(Some(
            RegistrationDetails::try_from_parts(username, email, password)?,
        )),
        _ => Err(ConfigError::PartialAdmin),
    }
}

#[cfg(test)]
mod tests {
    //! Settings loading and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::{fixture, rstest};

    const VARS: [&str; 10] = [
        "WARDEN_BIND_ADDR",
        "WARDEN_DATABASE_URL",
        "WARDEN_JWT_SECRET",
        "WARDEN_JWT_ALGORITHM",
        "WARDEN_TOKEN_TTL_MINUTES",
        "WARDEN_ADMIN_USERNAME",
        "WARDEN_ADMIN_EMAIL",
        "WARDEN_ADMIN_PASSWORD",
        "WARDEN_ALLOW_EPHEMERAL_SECRET",
        "WARDEN_RUN_MIGRATIONS",
    ];
    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("warden")]).expect("config should load")
    }

    #[fixture]
    fn settings() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            jwt_secret: Some(SECRET.to_owned()),
            jwt_algorithm: None,
            token_ttl_minutes: None,
            admin_username: None,
            admin_email: None,
            admin_password: None,
            allow_ephemeral_secret: false,
            run_migrations: true,
        }
    }

    #[rstest]
    fn defaults_apply_when_environment_is_empty() {
        let _guard = lock_env(env_with(&[]));

        let loaded = load();

        assert!(loaded.database_url.is_none());
        assert!(loaded.run_migrations);
        assert!(!loaded.allow_ephemeral_secret);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("WARDEN_JWT_ALGORITHM", "hs512"),
            ("WARDEN_TOKEN_TTL_MINUTES", "5"),
            ("WARDEN_RUN_MIGRATIONS", "false"),
        ]));

        let loaded = load();

        assert_eq!(loaded.jwt_algorithm.as_deref(), Some("hs512"));
        assert_eq!(loaded.token_ttl_minutes, Some(5));
        assert!(!loaded.run_migrations);
    }

    #[rstest]
    fn validated_defaults(settings: AppSettings) {
        let config = ServerConfig::from_settings(&settings, false).expect("valid config");
        assert_eq!(config.bind_addr().to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.token_ttl, Duration::minutes(30));
        assert_eq!(config.jwt_algorithm, JwtAlgorithm::HS256);
        assert_eq!(config.jwt_secret, SECRET.as_bytes());
        assert!(config.bootstrap_admin.is_none());
    }

    #[rstest]
    #[case::debug_build(true, false)]
    #[case::explicit_opt_in(false, true)]
    fn ephemeral_secret_when_allowed(
        mut settings: AppSettings,
        #[case] debug_build: bool,
        #[case] opt_in: bool,
    ) {
        settings.jwt_secret = None;
        settings.allow_ephemeral_secret = opt_in;

        let config = ServerConfig::from_settings(&settings, debug_build).expect("valid config");

        assert_eq!(config.jwt_secret.len(), EPHEMERAL_SECRET_BYTES * 2);
    }

    #[rstest]
    fn missing_secret_is_fatal_in_release(mut settings: AppSettings) {
        settings.jwt_secret = None;
        assert!(matches!(
            ServerConfig::from_settings(&settings, false),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[rstest]
    fn short_secret_is_rejected(mut settings: AppSettings) {
        settings.jwt_secret = Some("short".to_owned());
        assert!(matches!(
            ServerConfig::from_settings(&settings, true),
            Err(ConfigError::Jwt(JwtConfigError::SecretTooShort { .. }))
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn non_positive_ttl_is_rejected(mut settings: AppSettings, #[case] minutes: i64) {
        settings.token_ttl_minutes = Some(minutes);
        assert!(matches!(
            ServerConfig::from_settings(&settings, false),
            Err(ConfigError::TokenTtl(m)) if m == minutes
        ));
    }

    #[rstest]
    fn unknown_algorithm_is_rejected(mut settings: AppSettings) {
        settings.jwt_algorithm = Some("RS256".to_owned());
        assert!(matches!(
            ServerConfig::from_settings(&settings, false),
            Err(ConfigError::Jwt(JwtConfigError::UnsupportedAlgorithm(_)))
        ));
    }

    #[rstest]
    fn admin_fields_must_come_together(mut settings: AppSettings) {
        settings.admin_username = Some("root".to_owned());
        assert!(matches!(
            ServerConfig::from_settings(&settings, false),
            Err(ConfigError::PartialAdmin)
        ));

        settings.admin_email = Some("root@example.com".to_owned());
        settings.admin_password = Some("s3cret".to_owned());
        let config = ServerConfig::from_settings(&settings, false).expect("valid config");
        let admin = config.bootstrap_admin.expect("admin configured");
        assert_eq!(admin.username().as_ref(), "root");
    }

    #[rstest]
    fn debug_output_hides_secrets(mut settings: AppSettings) {
        settings.admin_password = Some("hunter2".to_owned());
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("hunter2"));
    }
}
