use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_token_minutes <= 0 {
            errors.push("auth.access_token_minutes must be > 0".to_string());
        }

        if auth.refresh_token_days <= 0 {
            errors.push("auth.refresh_token_days must be > 0".to_string());
        }

        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < 8 {
            errors.push("auth.admin_password must be at least 8 characters".to_string());
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use crate::auth::providers::AuthProviderId;
    use crate::config::{AppConfig, AuthConfig};

    use super::validate;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            provider: AuthProviderId::Local,
            jwt_secret: "unit-test-secret".to_string(),
            access_token_minutes: 15,
            refresh_token_days: 30,
            admin_name: "Administrator".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "adminpassword".to_string(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn auth_section_requires_secret_and_lifetimes() {
        let mut cfg = AppConfig::default();
        let mut auth = auth_config();
        auth.jwt_secret = "  ".to_string();
        auth.access_token_minutes = 0;
        cfg.auth = Some(auth);

        let err = validate(&cfg).expect_err("config should be rejected");
        let message = err.to_string();
        assert!(message.contains("auth.jwt_secret"));
        assert!(message.contains("auth.access_token_minutes"));
    }

    #[test]
    fn short_admin_password_is_rejected() {
        let mut cfg = AppConfig::default();
        let mut auth = auth_config();
        auth.admin_password = "short".to_string();
        cfg.auth = Some(auth);

        let err = validate(&cfg).expect_err("config should be rejected");
        assert!(err.to_string().contains("auth.admin_password"));
    }
}
