use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, DbErr, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    auth::{
        Claims, Role, TokenBundle, UserSummary,
        jwt::{
            JwtKeys, decode_expired_token, decode_token, encode_token, make_access_claims,
            new_refresh_token,
        },
        password::{hash_password, verify_password},
    },
    config::AuthConfig,
    db::dao::{DaoBase, DaoLayerError, RefreshTokenDao, UserDao},
    db::entities::user,
    error::AppError,
};

use super::{AuthProvider, AuthProviderId};

/// Session manager backed by the local credential store and token ledger.
#[derive(Clone)]
pub struct LocalAuthProvider {
    db: DatabaseConnection,
    user_dao: UserDao,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
    access_ttl_secs: usize,
    refresh_ttl_days: i64,
}

fn db_err(err: DbErr) -> AppError {
    AppError::from(DaoLayerError::Db(err))
}

impl LocalAuthProvider {
    pub fn new(
        db: &DatabaseConnection,
        user_dao: UserDao,
        refresh_token_dao: RefreshTokenDao,
        jwt: JwtKeys,
        cfg: &AuthConfig,
    ) -> Self {
        Self {
            db: db.clone(),
            user_dao,
            refresh_token_dao,
            jwt,
            access_ttl_secs: (cfg.access_token_minutes * 60) as usize,
            refresh_ttl_days: cfg.refresh_token_days,
        }
    }

    /// Mint an access/refresh pair and record the ledger row on `conn`, so
    /// the caller can bundle it with whatever user mutation belongs to the
    /// same unit of work.
    async fn issue_tokens<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        user: &user::Model,
    ) -> Result<TokenBundle, AppError> {
        let claims = make_access_claims(user, self.access_ttl_secs);
        let access_token = encode_token(&self.jwt, &claims)?;
        let jti = Uuid::parse_str(&claims.jti)
            .map_err(|err| AppError::internal(format!("generated jti invalid: {err}")))?;

        let expires_at = Utc::now().fixed_offset() + Duration::days(self.refresh_ttl_days);
        let row = self
            .refresh_token_dao
            .record(conn, &user.id, &jti, &new_refresh_token(), expires_at)
            .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token: row.token,
            token_type: "Bearer",
            expires_in: self.access_ttl_secs,
            user: UserSummary::from(user),
        })
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenBundle, AppError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Name required"));
        }
        if email.is_empty() {
            return Err(AppError::bad_request("Email required"));
        }

        // Deactivated accounts keep their email reserved.
        if self.user_dao.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = hash_password(password)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let user = self
            .user_dao
            .insert_user(&txn, name, email, &password_hash, Role::User.as_str())
            .await?;
        let bundle = self.issue_tokens(&txn, &user).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(user_id = %bundle.user.id, "user registered");
        Ok(bundle)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        // One message for unknown email and wrong password.
        let user = self
            .user_dao
            .find_active_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        // The login stamp and the ledger row land together or not at all.
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;
        self.user_dao.stamp_last_login(&txn, &user.id, &now).await?;
        let mut user = user;
        user.last_login_at = Some(now);
        let bundle = self.issue_tokens(&txn, &user).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(bundle)
    }

    async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenBundle, AppError> {
        // Expired is fine here; forged is not.
        let claims = decode_expired_token(&self.jwt, access_token)
            .map_err(|_| AppError::unauthorized("Invalid access token"))?;
        let jti = Uuid::parse_str(&claims.jti)
            .map_err(|_| AppError::unauthorized("Invalid access token"))?;

        let row = self
            .refresh_token_dao
            .find_active(refresh_token, &jti)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if row.expires_at < Utc::now().fixed_offset() {
            return Err(AppError::unauthorized("Refresh token expired"));
        }

        let user = self
            .user_dao
            .find_active_by_id(&row.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let revoked = self.refresh_token_dao.revoke(&txn, &row.token).await?;
        if revoked == 0 {
            // A concurrent rotation consumed this row first; dropping the
            // transaction rolls back.
            return Err(AppError::unauthorized("Invalid refresh token"));
        }
        let bundle = self.issue_tokens(&txn, &user).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(bundle)
    }

    async fn logout(&self, user_id: &Uuid, jti: Option<&Uuid>) -> Result<(), AppError> {
        let revoked = self.refresh_token_dao.revoke_all_for_user(user_id, jti).await?;
        tracing::info!(user_id = %user_id, revoked, "sessions revoked");
        Ok(())
    }

    async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_dao
            .find_active_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let password_hash = hash_password(new_password)?;
        self.user_dao
            .update(user.id, move |active| {
                active.password_hash = Set(password_hash);
            })
            .await?;

        // Every open session dies with the old password.
        self.refresh_token_dao
            .revoke_all_for_user(&user.id, None)
            .await?;

        Ok(())
    }

    async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        decode_token(&self.jwt, access_token)
    }

    async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        if let Some(existing) = self
            .user_dao
            .find_by_email(&cfg.admin_email)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?
        {
            tracing::info!("admin user already present: {}", existing.email);
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|e| anyhow::anyhow!("admin seed hash error: {}", e.message()))?;
        let user = self
            .user_dao
            .create_user(&cfg.admin_name, &cfg.admin_email, &hash, Role::Admin.as_str())
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        tracing::info!("seeded admin user {}", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, DbErr, IntoMockRow, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::{
        auth::{
            Role,
            jwt::{JwtKeys, encode_token, make_access_claims},
            password::hash_password,
            providers::AuthProvider,
        },
        config::AuthConfig,
        db::dao::DaoBase,
        db::entities::{refresh_token, user},
    };

    use super::{AuthProviderId, LocalAuthProvider};

    struct ProviderFixtureBuilder {
        mock: MockDatabase,
        secret: Vec<u8>,
    }

    impl ProviderFixtureBuilder {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
                secret: b"test-secret".to_vec(),
            }
        }

        fn with_secret(mut self, secret: &[u8]) -> Self {
            self.secret = secret.to_vec();
            self
        }

        fn with_query_results<T, I, II>(mut self, sets: II) -> Self
        where
            T: IntoMockRow,
            I: IntoIterator<Item = T>,
            II: IntoIterator<Item = I>,
        {
            self.mock = self.mock.append_query_results(sets);
            self
        }

        fn with_query_error(mut self, error: DbErr) -> Self {
            self.mock = self.mock.append_query_errors([error]);
            self
        }

        fn with_exec_result(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn build(self) -> LocalAuthProvider {
            let db = self.mock.into_connection();
            LocalAuthProvider::new(
                &db,
                DaoBase::new(&db),
                DaoBase::new(&db),
                JwtKeys::from_secret(&self.secret),
                &test_config(),
            )
        }
    }

    fn test_config() -> AuthConfig {
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

    fn now() -> chrono::DateTime<chrono::FixedOffset> {
        Utc::now().fixed_offset()
    }

    fn user_model(id: Uuid, email: &str, password_hash: &str, role: &str) -> user::Model {
        user::Model {
            id,
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            is_active: true,
            created_at: now(),
            updated_at: now(),
            last_login_at: None,
        }
    }

    fn refresh_token_model(
        token: &str,
        jti: Uuid,
        user_id: Uuid,
        expires_at: chrono::DateTime<chrono::FixedOffset>,
    ) -> refresh_token::Model {
        refresh_token::Model {
            id: Uuid::new_v4(),
            token: token.to_string(),
            jti,
            user_id,
            expires_at,
            used: false,
            revoked: false,
            revoked_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    /// A signed access token plus the jti embedded in it.
    fn access_token_with_jti(provider_secret: &[u8], user: &user::Model) -> (String, Uuid) {
        let claims = make_access_claims(user, 900);
        let token = encode_token(&JwtKeys::from_secret(provider_secret), &claims)
            .expect("token should encode");
        let jti = Uuid::parse_str(&claims.jti).expect("jti should parse");
        (token, jti)
    }

    #[tokio::test]
    async fn provider_id_is_local() {
        let provider = ProviderFixtureBuilder::new().build();
        assert_eq!(provider.id(), AuthProviderId::Local);
    }

    #[tokio::test]
    async fn verify_accepts_valid_token() {
        let provider = ProviderFixtureBuilder::new()
            .with_secret(b"verify-secret")
            .build();
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, _) = access_token_with_jti(b"verify-secret", &user);

        let claims = provider.verify(&token).await.expect("verify should succeed");
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn verify_rejects_token_signed_with_different_secret() {
        let provider = ProviderFixtureBuilder::new()
            .with_secret(b"provider-secret-a")
            .build();
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, _) = access_token_with_jti(b"provider-secret-b", &user);

        let err = provider
            .verify(&token)
            .await
            .expect_err("verify should fail for mismatched secret");
        assert!(err.message().starts_with("Invalid or expired token:"));
    }

    #[tokio::test]
    async fn register_rejects_blank_name_and_email() {
        let provider = ProviderFixtureBuilder::new().build();

        let err = provider
            .register("  ", "alice@example.com", "password123")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Name required");

        let err = provider
            .register("Alice", "   ", "password123")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Email required");
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![user_model(
                Uuid::new_v4(),
                "alice@example.com",
                "hash",
                "user",
            )]])
            .build();

        let err = provider
            .register("Alice", "alice@example.com", "password123")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Email already registered");
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = provider
            .register("Alice", "alice@example.com", "short")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Password too short");
    }

    #[tokio::test]
    async fn register_returns_bundle_with_user_role() {
        let user_id = Uuid::new_v4();
        let provider = ProviderFixtureBuilder::new()
            .with_secret(b"register-secret")
            .with_query_results([Vec::<user::Model>::new()])
            .with_query_results([vec![user_model(
                user_id,
                "alice@example.com",
                "hashed-password",
                "user",
            )]])
            .with_query_results([vec![refresh_token_model(
                "refresh-register-1",
                Uuid::new_v4(),
                user_id,
                now() + Duration::days(30),
            )]])
            .build();

        let bundle = provider
            .register("Alice", "alice@example.com", "password123")
            .await
            .expect("register should succeed");

        assert_eq!(bundle.refresh_token, "refresh-register-1");
        assert_eq!(bundle.token_type, "Bearer");
        assert_eq!(bundle.expires_in, 15 * 60);
        assert_eq!(bundle.user.id, user_id);
        assert_eq!(bundle.user.role, Role::User);

        let claims = provider
            .verify(&bundle.access_token)
            .await
            .expect("token should verify");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.email, "alice@example.com");
    }

    #[tokio::test]
    async fn login_rejects_missing_or_inactive_user() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = provider
            .login("alice@example.com", "password123")
            .await
            .expect_err("login should fail");
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_with_same_message() {
        let password_hash = hash_password("correct-password").expect("hash should succeed");
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![user_model(
                Uuid::new_v4(),
                "alice@example.com",
                &password_hash,
                "user",
            )]])
            .build();

        let err = provider
            .login("alice@example.com", "wrong-password")
            .await
            .expect_err("login should fail");
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_returns_bundle_and_stamps_last_login() {
        let user_id = Uuid::new_v4();
        let password_hash = hash_password("password123").expect("hash should succeed");
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![user_model(
                user_id,
                "alice@example.com",
                &password_hash,
                "user",
            )]])
            .with_exec_result(1)
            .with_query_results([vec![refresh_token_model(
                "refresh-login-1",
                Uuid::new_v4(),
                user_id,
                now() + Duration::days(30),
            )]])
            .build();

        let bundle = provider
            .login("alice@example.com", "password123")
            .await
            .expect("login should succeed");

        assert_eq!(bundle.refresh_token, "refresh-login-1");
        assert!(bundle.user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn login_manager_claim_carries_manager_role() {
        let user_id = Uuid::new_v4();
        let password_hash = hash_password("password123").expect("hash should succeed");
        let provider = ProviderFixtureBuilder::new()
            .with_secret(b"manager-claim-secret")
            .with_query_results([vec![user_model(
                user_id,
                "manager@example.com",
                &password_hash,
                "manager",
            )]])
            .with_exec_result(1)
            .with_query_results([vec![refresh_token_model(
                "refresh-login-manager",
                Uuid::new_v4(),
                user_id,
                now() + Duration::days(30),
            )]])
            .build();

        let bundle = provider
            .login("manager@example.com", "password123")
            .await
            .expect("login should succeed");
        let claims = provider
            .verify(&bundle.access_token)
            .await
            .expect("token should verify");

        assert_eq!(claims.role, Role::Manager);
    }

    #[tokio::test]
    async fn refresh_rejects_forged_access_token() {
        let provider = ProviderFixtureBuilder::new()
            .with_secret(b"refresh-secret-a")
            .build();
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, _) = access_token_with_jti(b"refresh-secret-b", &user);

        let err = provider
            .refresh(&token, "any-refresh-value")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Invalid access token");
    }

    #[tokio::test]
    async fn refresh_rejects_missing_or_revoked_row() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<refresh_token::Model>::new()])
            .build();
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, _) = access_token_with_jti(b"test-secret", &user);

        let err = provider
            .refresh(&token, "unknown-refresh-value")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn refresh_rejects_expired_row() {
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, jti) = access_token_with_jti(b"test-secret", &user);
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![refresh_token_model(
                "expired-refresh",
                jti,
                user.id,
                now() - Duration::minutes(1),
            )]])
            .build();

        let err = provider
            .refresh(&token, "expired-refresh")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Refresh token expired");
    }

    #[tokio::test]
    async fn refresh_rejects_row_for_deactivated_user() {
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, jti) = access_token_with_jti(b"test-secret", &user);
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![refresh_token_model(
                "valid-refresh",
                jti,
                user.id,
                now() + Duration::days(1),
            )]])
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = provider
            .refresh(&token, "valid-refresh")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn refresh_loses_race_when_row_already_consumed() {
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, jti) = access_token_with_jti(b"test-secret", &user);
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![refresh_token_model(
                "contested-refresh",
                jti,
                user.id,
                now() + Duration::days(1),
            )]])
            .with_query_results([vec![user.clone()]])
            .with_exec_result(0)
            .build();

        let err = provider
            .refresh(&token, "contested-refresh")
            .await
            .expect_err("refresh should fail");
        assert_eq!(err.message(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn refresh_rotates_to_a_new_pair() {
        let user = user_model(Uuid::new_v4(), "alice@example.com", "hash", "user");
        let (token, jti) = access_token_with_jti(b"test-secret", &user);
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![refresh_token_model(
                "old-refresh-token",
                jti,
                user.id,
                now() + Duration::days(1),
            )]])
            .with_query_results([vec![user.clone()]])
            .with_exec_result(1)
            .with_query_results([vec![refresh_token_model(
                "new-refresh-token",
                Uuid::new_v4(),
                user.id,
                now() + Duration::days(30),
            )]])
            .build();

        let bundle = provider
            .refresh(&token, "old-refresh-token")
            .await
            .expect("refresh should succeed");

        assert_eq!(bundle.refresh_token, "new-refresh-token");
        assert_ne!(bundle.access_token, token);

        let claims = provider
            .verify(&bundle.access_token)
            .await
            .expect("new token should verify");
        assert_ne!(claims.jti, jti.to_string(), "rotation mints a fresh jti");
    }

    #[tokio::test]
    async fn logout_revokes_sessions() {
        let provider = ProviderFixtureBuilder::new().with_exec_result(2).build();

        provider
            .logout(&Uuid::new_v4(), None)
            .await
            .expect("logout should succeed");
    }

    #[tokio::test]
    async fn logout_single_session_passes_jti_filter() {
        let provider = ProviderFixtureBuilder::new().with_exec_result(1).build();

        provider
            .logout(&Uuid::new_v4(), Some(&Uuid::new_v4()))
            .await
            .expect("logout should succeed");
    }

    #[tokio::test]
    async fn change_password_rejects_wrong_current_password() {
        let password_hash = hash_password("current-password").expect("hash should succeed");
        let user_id = Uuid::new_v4();
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![user_model(
                user_id,
                "alice@example.com",
                &password_hash,
                "user",
            )]])
            .build();

        let err = provider
            .change_password(&user_id, "wrong-password", "new-password-1")
            .await
            .expect_err("change should fail");
        assert_eq!(err.message(), "Current password is incorrect");
    }

    #[tokio::test]
    async fn change_password_rehashes_and_revokes_all_sessions() {
        let password_hash = hash_password("current-password").expect("hash should succeed");
        let user_id = Uuid::new_v4();
        let stored = user_model(user_id, "alice@example.com", &password_hash, "user");
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![stored.clone()]])
            .with_query_results([vec![stored.clone()]])
            .with_query_results([vec![stored]])
            .with_exec_result(3)
            .build();

        provider
            .change_password(&user_id, "current-password", "new-password-1")
            .await
            .expect("change should succeed");
    }

    #[tokio::test]
    async fn seed_admin_noops_when_admin_exists() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([vec![user_model(
                Uuid::new_v4(),
                "admin@example.com",
                "hashed-password",
                "admin",
            )]])
            .build();

        provider
            .seed_admin(&test_config())
            .await
            .expect("seed should succeed");
    }

    #[tokio::test]
    async fn seed_admin_creates_admin_when_missing() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .with_query_results([vec![user_model(
                Uuid::new_v4(),
                "admin@example.com",
                "hashed-password",
                "admin",
            )]])
            .build();

        provider
            .seed_admin(&test_config())
            .await
            .expect("seed should succeed");
    }

    #[tokio::test]
    async fn seed_admin_fails_when_admin_password_too_short() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();
        let mut cfg = test_config();
        cfg.admin_password = "short".to_string();

        let err = provider
            .seed_admin(&cfg)
            .await
            .expect_err("seed should fail");
        assert!(err.to_string().starts_with("admin seed hash error:"));
    }

    #[tokio::test]
    async fn seed_admin_surfaces_generic_store_failure() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .with_query_error(DbErr::Custom("insert failed".to_string()))
            .build();

        let err = provider
            .seed_admin(&test_config())
            .await
            .expect_err("seed should fail");
        assert_eq!(
            err.to_string(),
            "database operation failed. Please check the logs for more details"
        );
    }
}
