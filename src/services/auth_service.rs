use uuid::Uuid;

use crate::{
    auth::{Claims, TokenBundle, providers::AuthProviders},
    config::AuthConfig,
    error::AppError,
};

/// Thin facade over whichever provider is active. Handlers talk to this,
/// never to a concrete provider.
#[derive(Clone, Copy)]
pub struct AuthService<'a> {
    providers: &'a AuthProviders,
}

impl<'a> AuthService<'a> {
    pub fn new(providers: &'a AuthProviders) -> Self {
        Self { providers }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenBundle, AppError> {
        self.providers
            .active()?
            .register(name, email, password)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        self.providers.active()?.login(email, password).await
    }

    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenBundle, AppError> {
        self.providers
            .active()?
            .refresh(access_token, refresh_token)
            .await
    }

    pub async fn logout(&self, user_id: &Uuid, jti: Option<&Uuid>) -> Result<(), AppError> {
        self.providers.active()?.logout(user_id, jti).await
    }

    pub async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.providers
            .active()?
            .change_password(user_id, current_password, new_password)
            .await
    }

    pub async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        self.providers.active()?.verify(access_token).await
    }

    pub async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        self.providers
            .active()
            .map_err(|err| anyhow::anyhow!(err.to_string()))?
            .seed_admin(cfg)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::auth::{Role, UserSummary, providers::AuthProviderId};

    use super::*;

    #[derive(Clone)]
    struct DelegatingProvider;

    fn summary() -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            is_active: true,
            created_at: chrono::Utc::now().fixed_offset(),
            last_login_at: None,
        }
    }

    fn bundle(access_token: String, refresh_token: String) -> TokenBundle {
        TokenBundle {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: 900,
            user: summary(),
        }
    }

    #[async_trait]
    impl crate::auth::providers::AuthProvider for DelegatingProvider {
        fn id(&self) -> AuthProviderId {
            AuthProviderId::Local
        }

        async fn register(
            &self,
            _name: &str,
            email: &str,
            _password: &str,
        ) -> Result<TokenBundle, AppError> {
            Ok(bundle(format!("register:{email}"), "refresh-register".into()))
        }

        async fn login(&self, email: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Ok(bundle(format!("login:{email}"), "refresh-login".into()))
        }

        async fn refresh(
            &self,
            _access_token: &str,
            refresh_token: &str,
        ) -> Result<TokenBundle, AppError> {
            Ok(bundle(
                format!("refresh:{refresh_token}"),
                refresh_token.to_string(),
            ))
        }

        async fn logout(&self, _user_id: &Uuid, jti: Option<&Uuid>) -> Result<(), AppError> {
            if jti.is_some() {
                Ok(())
            } else {
                Err(AppError::internal("expected jti"))
            }
        }

        async fn change_password(
            &self,
            _user_id: &Uuid,
            _current_password: &str,
            _new_password: &str,
        ) -> Result<(), AppError> {
            Ok(())
        }

        async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
            Ok(Claims {
                sub: access_token.to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                role: Role::User,
                jti: Uuid::new_v4().to_string(),
                iat: 10,
                exp: 100,
            })
        }
    }

    #[tokio::test]
    async fn delegates_to_the_active_provider() {
        let providers = AuthProviders::new(AuthProviderId::Local)
            .with_provider(Arc::new(DelegatingProvider))
            .expect("provider registration should succeed");
        let service = AuthService::new(&providers);

        let register = service
            .register("Alice", "alice@example.com", "password123")
            .await
            .expect("register should succeed");
        assert_eq!(register.access_token, "register:alice@example.com");

        let login = service
            .login("alice@example.com", "password123")
            .await
            .expect("login should succeed");
        assert_eq!(login.access_token, "login:alice@example.com");

        let refreshed = service
            .refresh("stale-access", "refresh-token-1")
            .await
            .expect("refresh should succeed");
        assert_eq!(refreshed.access_token, "refresh:refresh-token-1");

        let claims = service
            .verify("subject-1")
            .await
            .expect("verify should succeed");
        assert_eq!(claims.sub, "subject-1");

        service
            .logout(&Uuid::new_v4(), Some(&Uuid::new_v4()))
            .await
            .expect("logout should delegate the jti");
    }
}
