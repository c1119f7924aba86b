//! Authentication service - credential checks and token issuance.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use common::{AppError, AppResult, JwtConfig, OptionExt};
use domain::{
    normalize_email, AdminAccount, Password, RecordId, DUMMY_PASSWORD_HASH, SECONDS_PER_HOUR,
    TOKEN_TYPE_BEARER,
};

use crate::repository::AdminRepository;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub role: String,
    pub require_password_change: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// The admin must set a new password before doing anything else
    pub require_password_change: bool,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and return a JWT
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Replace the password of the account identified by `admin_id`
    async fn change_password(
        &self,
        admin_id: &str,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for an account
fn generate_token(account: &AdminAccount, config: &JwtConfig) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let lifetime = Duration::try_hours(config.expiration_hours)
        .ok_or_else(|| AppError::internal("JWT expiration is out of range"))?;
    let expires_at = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::internal("JWT expiration is out of range"))?;

    let claims = Claims {
        sub: account.id.to_string(),
        email: account.email.clone(),
        role: account.role.to_string(),
        require_password_change: account.require_password_change,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.expiration_hours * SECONDS_PER_HOUR,
        require_password_change: account.require_password_change,
    })
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    repo: Arc<dyn AdminRepository>,
    config: JwtConfig,
}

impl Authenticator {
    pub fn new(repo: Arc<dyn AdminRepository>, config: JwtConfig) -> Self {
        Self { repo, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        let account = self.repo.find_account_by_email(&email).await?;

        // Verify against a dummy hash for unknown emails so timing does not
        // reveal which accounts exist
        let stored = account
            .as_ref()
            .map(AdminAccount::password)
            .unwrap_or_else(|| Password::from_hash(DUMMY_PASSWORD_HASH));
        let password_valid = stored.verify(&password);

        let Some(account) = account else {
            tracing::info!(email = %email, "Login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !account.is_active {
            return Err(AppError::AccountDisabled);
        }
        if !account.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        if !password_valid {
            self.repo.record_failed_login(&account.id).await?;
            tracing::warn!(
                admin_id = %account.id,
                attempts = account.failed_login_attempts + 1,
                "Invalid password"
            );
            return Err(AppError::InvalidCredentials);
        }

        if account.failed_login_attempts != 0 {
            self.repo.reset_failed_logins(&account.id).await?;
        }

        tracing::info!(admin_id = %account.id, role = %account.role, "Admin logged in");
        generate_token(&account, &self.config)
    }

    async fn change_password(
        &self,
        admin_id: &str,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let id = RecordId::parse(admin_id, "admin")?;
        let mut identity = self
            .repo
            .find_identity(&id)
            .await?
            .ok_or_not_found("User not found")?;

        if !identity.account.password().verify(&current_password) {
            return Err(AppError::validation("Current password is incorrect"));
        }

        let password = Password::new(&new_password)?;
        let plan = identity.change_password(password, Utc::now());
        self.repo.save_identity(&identity, &plan).await?;

        tracing::info!(admin_id = %id, "Password changed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockAdminRepository;
    use domain::AdminRole;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".to_string(),
            expiration_hours: 1,
        }
    }

    fn account(password: &str) -> AdminAccount {
        let now = Utc::now();
        AdminAccount {
            id: RecordId::generate(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: AdminRole::Admin,
            university: None,
            is_active: true,
            require_password_change: true,
            failed_login_attempts: 2,
            last_password_change: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn login_issues_token_and_resets_counter() {
        let stored = account("password1");
        let id = stored.id.clone();

        let mut repo = MockAdminRepository::new();
        repo.expect_find_account_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_reset_failed_logins()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(|_| Ok(()));

        let auth = Authenticator::new(Arc::new(repo), config());
        let token = auth
            .login("A@x.com".to_string(), "password1".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);
        assert!(token.require_password_change);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, "admin");
    }

    #[tokio::test]
    async fn wrong_password_records_failed_attempt() {
        let stored = account("password1");

        let mut repo = MockAdminRepository::new();
        repo.expect_find_account_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_record_failed_login().times(1).returning(|_| Ok(()));
        repo.expect_reset_failed_logins().never();

        let auth = Authenticator::new(Arc::new(repo), config());
        let err = auth
            .login("a@x.com".to_string(), "wrong-password".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn inactive_account_is_rejected() {
        let mut stored = account("password1");
        stored.is_active = false;

        let mut repo = MockAdminRepository::new();
        repo.expect_find_account_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let auth = Authenticator::new(Arc::new(repo), config());
        let err = auth
            .login("a@x.com".to_string(), "password1".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AccountDisabled));
        assert_eq!(err.to_string(), "User is inactive");
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        repo.expect_record_failed_login().never();

        let auth = Authenticator::new(Arc::new(repo), config());
        let err = auth
            .login("nobody@x.com".to_string(), "password1".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn oversized_expiration_fails_without_panicking() {
        let stored = account("password1");

        let mut repo = MockAdminRepository::new();
        repo.expect_find_account_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_reset_failed_logins().returning(|_| Ok(()));

        let config = JwtConfig {
            expiration_hours: i64::MAX,
            ..config()
        };
        let auth = Authenticator::new(Arc::new(repo), config);
        let err = auth
            .login("a@x.com".to_string(), "password1".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let repo = MockAdminRepository::new();
        let auth = Authenticator::new(Arc::new(repo), config());
        assert!(auth.verify_token("not.a.token").is_err());
    }
}
