use chrono::Duration;
use config::ConfigError;

use crate::auth::DEFAULT_REFRESH_TOKEN_TTL_DAYS;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Signing secret and token lifetimes, handed explicitly to the session manager
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub secret: String,
    #[serde(default = "default_access_token_ttl_seconds")]
    pub access_token_ttl_seconds: i64,
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
}

fn default_access_token_ttl_seconds() -> i64 {
    3600
}

fn default_refresh_token_ttl_days() -> i64 {
    DEFAULT_REFRESH_TOKEN_TTL_DAYS
}

impl AuthSettings {
    /// Settings with the default lifetimes (1 hour access, 60 days refresh)
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl_seconds: default_access_token_ttl_seconds(),
            refresh_token_ttl_days: default_refresh_token_ttl_days(),
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_seconds)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_ttl_days)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Message("auth.secret must not be empty".to_string()));
        }
        if self.access_token_ttl_seconds <= 0 || self.refresh_token_ttl_days <= 0 {
            return Err(ConfigError::Message("token lifetimes must be positive".to_string()));
        }
        Ok(())
    }
}

/// Load settings from `configuration.*` overlaid with `APP__` environment variables
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.auth.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let settings = AuthSettings::new("secret");

        assert_eq!(settings.access_token_ttl(), Duration::hours(1));
        assert_eq!(settings.refresh_token_ttl(), Duration::days(60));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(AuthSettings::new("").validate().is_err());
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let mut settings = AuthSettings::new("secret");
        settings.access_token_ttl_seconds = 0;

        assert!(settings.validate().is_err());
    }
}
