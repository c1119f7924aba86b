//! Admin service - keeps account and membership records in step.
//!
//! Ids are validated before any query. All multi-record writes go through
//! [`AdminRepository::save_identity`] or [`AdminRepository::delete_identity`],
//! which are atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{
    normalize_email, AdminChanges, AdminIdentity, AdminRole, AdminView, CreatedAdmin,
    MembershipStatus, NewAdmin, Password, RecordId,
};

use crate::repository::AdminRepository;
use crate::types::{DeletedAdmin, PageParams};

pub const ADMIN_EXISTS: &str = "An admin with this email already exists in the central role system.";
pub const SUPER_ADMIN_EXISTS: &str =
    "This email is registered as a super-admin. Cannot create a university admin role.";
pub const NON_ADMIN_EXISTS: &str =
    "User with this email exists but is not an admin. Operation not supported by this endpoint.";
pub const EMAIL_TAKEN: &str = "Another user with this email already exists in roles.";
pub const ADMIN_DELETED: &str = "Admin user and associated links deleted successfully";
const ADMIN_NOT_FOUND: &str = "Admin not found";

/// Input for creating a university admin.
#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub university: String,
    /// Defaults to Active
    pub status: Option<MembershipStatus>,
}

/// Partial admin update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdmin {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub university: Option<String>,
    pub status: Option<MembershipStatus>,
    pub role: Option<String>,
}

/// Admin service trait for dependency injection.
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Admins tied to a university; empty when no university is given
    async fn list_admins(
        &self,
        university: Option<String>,
        page: PageParams,
    ) -> AppResult<Vec<AdminView>>;

    /// Create a university admin account
    async fn create_admin(&self, input: CreateAdmin) -> AppResult<CreatedAdmin>;

    /// Merged view of one admin, optionally scoped to a university
    async fn get_admin(&self, id: &str, university: Option<String>) -> AppResult<AdminView>;

    /// Update the account and reconcile memberships
    async fn update_admin(&self, id: &str, update: UpdateAdmin) -> AppResult<AdminView>;

    /// Remove an account and all of its memberships
    async fn delete_admin(&self, id: &str) -> AppResult<DeletedAdmin>;

    /// Create the first super-admin. Returns `None` if one already exists.
    async fn seed_super_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<Option<RecordId>>;

    /// Check storage connectivity
    async fn health(&self) -> AppResult<()>;
}

/// Concrete implementation of AdminService using repository.
pub struct AdminManager {
    repo: Arc<dyn AdminRepository>,
}

impl AdminManager {
    /// Create new admin service instance with repository
    pub fn new(repo: Arc<dyn AdminRepository>) -> Self {
        Self { repo }
    }

    async fn load(&self, id: &RecordId) -> AppResult<AdminIdentity> {
        self.repo
            .find_identity(id)
            .await?
            .ok_or_not_found(ADMIN_NOT_FOUND)
    }
}

/// Blank query values are treated as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl AdminService for AdminManager {
    async fn list_admins(
        &self,
        university: Option<String>,
        page: PageParams,
    ) -> AppResult<Vec<AdminView>> {
        let Some(university) = non_blank(university) else {
            return Ok(Vec::new());
        };

        let identities = self.repo.list_by_university(&university, page).await?;
        Ok(identities
            .iter()
            .map(|identity| identity.view(Some(&university)))
            .collect())
    }

    async fn create_admin(&self, input: CreateAdmin) -> AppResult<CreatedAdmin> {
        let email = normalize_email(&input.email);

        if let Some(existing) = self.repo.find_account_by_email(&email).await? {
            let message = match existing.role {
                AdminRole::Admin => ADMIN_EXISTS,
                AdminRole::SuperAdmin => SUPER_ADMIN_EXISTS,
                AdminRole::Other(_) => NON_ADMIN_EXISTS,
            };
            return Err(AppError::conflict(message));
        }

        let status = input.status.unwrap_or_default();
        let password = Password::new(&input.password)?;
        let identity = AdminIdentity::enroll(
            NewAdmin {
                name: input.name,
                email,
                password,
                university: input.university,
                status,
            },
            Utc::now(),
        );

        self.repo.insert_account(&identity.account).await?;
        tracing::info!(admin_id = %identity.id(), email = %identity.email(), "Admin created");

        Ok(identity.created(status))
    }

    async fn get_admin(&self, id: &str, university: Option<String>) -> AppResult<AdminView> {
        let id = RecordId::parse(id, "admin")?;
        let identity = self.load(&id).await?;
        Ok(identity.view(non_blank(university).as_deref()))
    }

    async fn update_admin(&self, id: &str, update: UpdateAdmin) -> AppResult<AdminView> {
        let id = RecordId::parse(id, "admin")?;
        let mut identity = self.load(&id).await?;

        let email = update.email.as_deref().map(normalize_email);
        if let Some(email) = email.as_deref() {
            if email != identity.email() && self.repo.email_taken(email, &id).await? {
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
        }

        let password = update.password.as_deref().map(Password::new).transpose()?;
        let university = update.university.clone();
        let changes = AdminChanges {
            name: update.name,
            email,
            password,
            university: update.university,
            status: update.status,
            role: update.role.map(AdminRole::from),
        };

        let plan = identity.apply(changes, Utc::now());
        self.repo.save_identity(&identity, &plan).await?;
        tracing::info!(
            admin_id = %id,
            account_changed = plan.account_changed,
            memberships_created = plan.created.len(),
            memberships_updated = plan.updated.len(),
            "Admin updated"
        );

        let refreshed = self.load(&id).await?;
        Ok(refreshed.view(university.as_deref()))
    }

    async fn delete_admin(&self, id: &str) -> AppResult<DeletedAdmin> {
        let id = RecordId::parse(id, "admin")?;
        let email = self
            .repo
            .delete_identity(&id)
            .await?
            .ok_or_not_found(ADMIN_NOT_FOUND)?;

        tracing::info!(admin_id = %id, email = %email, "Admin deleted");
        Ok(DeletedAdmin {
            message: ADMIN_DELETED.to_string(),
            deleted_admin_email: email,
        })
    }

    async fn seed_super_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<Option<RecordId>> {
        if self.repo.has_super_admin().await? {
            return Ok(None);
        }

        let email = normalize_email(&email);
        if self.repo.find_account_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let identity = AdminIdentity::bootstrap(name, email, Password::new(&password)?, Utc::now());
        self.repo.insert_account(&identity.account).await?;
        Ok(Some(identity.id().clone()))
    }

    async fn health(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockAdminRepository;
    use chrono::Utc;
    use domain::{AdminAccount, Membership};
    use mockall::predicate::eq;

    const WOLDIA: &str = "Woldia University";

    fn account(role: AdminRole) -> AdminAccount {
        let now = Utc::now();
        AdminAccount {
            id: RecordId::generate(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            university: Some(WOLDIA.to_string()),
            is_active: true,
            require_password_change: true,
            failed_login_attempts: 0,
            last_password_change: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input() -> CreateAdmin {
        CreateAdmin {
            name: "A".to_string(),
            email: "A@X.com".to_string(),
            password: "password1".to_string(),
            university: WOLDIA.to_string(),
            status: Some(MembershipStatus::Active),
        }
    }

    #[tokio::test]
    async fn create_rejects_existing_admin_emails() {
        for (role, message) in [
            (AdminRole::Admin, ADMIN_EXISTS),
            (AdminRole::SuperAdmin, SUPER_ADMIN_EXISTS),
            (AdminRole::Other("user".to_string()), NON_ADMIN_EXISTS),
        ] {
            let mut repo = MockAdminRepository::new();
            let existing = account(role);
            repo.expect_find_account_by_email()
                .with(eq("a@x.com"))
                .returning(move |_| Ok(Some(existing.clone())));
            repo.expect_insert_account().never();

            let service = AdminManager::new(Arc::new(repo));
            let err = service.create_admin(create_input()).await.unwrap_err();

            assert!(matches!(err, AppError::Conflict(ref m) if m == message));
        }
    }

    #[tokio::test]
    async fn create_inserts_admin_requiring_password_change() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        repo.expect_insert_account()
            .withf(|account| {
                account.role == AdminRole::Admin
                    && account.require_password_change
                    && account.is_active
                    && account.email == "a@x.com"
                    && account.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = AdminManager::new(Arc::new(repo));
        let created = service.create_admin(create_input()).await.unwrap();

        assert_eq!(created.role, "admin");
        assert_eq!(created.university, WOLDIA);
        assert_eq!(created.status, MembershipStatus::Active);
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn get_rejects_malformed_id_without_querying() {
        let repo = MockAdminRepository::new();
        let service = AdminManager::new(Arc::new(repo));

        let err = service.get_admin("not-an-id", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid admin ID format"));
    }

    #[tokio::test]
    async fn get_missing_admin_is_not_found() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_identity().returning(|_| Ok(None));

        let service = AdminManager::new(Arc::new(repo));
        let err = service
            .get_admin("65a1b2c3d4e5f60718293a4b", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_account() {
        let current = account(AdminRole::Admin);
        let id = current.id.clone();

        let mut repo = MockAdminRepository::new();
        repo.expect_find_identity()
            .returning(move |_| Ok(Some(AdminIdentity::new(current.clone(), Vec::new()))));
        repo.expect_email_taken()
            .with(eq("taken@x.com"), eq(id.clone()))
            .returning(|_, _| Ok(true));
        repo.expect_save_identity().never();

        let service = AdminManager::new(Arc::new(repo));
        let err = service
            .update_admin(
                id.as_str(),
                UpdateAdmin {
                    email: Some("Taken@X.com".to_string()),
                    ..UpdateAdmin::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref m) if m == EMAIL_TAKEN));
    }

    #[tokio::test]
    async fn update_saves_new_membership_plan() {
        let current = account(AdminRole::Admin);
        let id = current.id.clone();

        let mut repo = MockAdminRepository::new();
        let loaded = current.clone();
        repo.expect_find_identity()
            .times(1)
            .returning(move |_| Ok(Some(AdminIdentity::new(loaded.clone(), Vec::new()))));
        repo.expect_save_identity()
            .withf(|identity, plan| {
                plan.created.len() == 1
                    && !plan.account_changed
                    && identity.memberships[0].status == MembershipStatus::Inactive
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let now = Utc::now();
        let saved = AdminIdentity::new(
            current.clone(),
            vec![Membership {
                id: RecordId::generate(),
                name: current.name.clone(),
                email: current.email.clone(),
                password_hash: current.password_hash.clone(),
                role: "admin".to_string(),
                university: WOLDIA.to_string(),
                status: MembershipStatus::Inactive,
                created_at: now,
                updated_at: now,
            }],
        );
        repo.expect_find_identity()
            .returning(move |_| Ok(Some(saved.clone())));

        let service = AdminManager::new(Arc::new(repo));
        let view = service
            .update_admin(
                id.as_str(),
                UpdateAdmin {
                    status: Some(MembershipStatus::Inactive),
                    university: Some(WOLDIA.to_string()),
                    ..UpdateAdmin::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.status, MembershipStatus::Inactive);
        assert_eq!(view.university, WOLDIA);
    }

    #[tokio::test]
    async fn list_without_university_is_empty() {
        let mut repo = MockAdminRepository::new();
        repo.expect_list_by_university().never();

        let service = AdminManager::new(Arc::new(repo));
        assert!(service
            .list_admins(None, PageParams::default())
            .await
            .unwrap()
            .is_empty());
        assert!(service
            .list_admins(Some("  ".to_string()), PageParams::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_reports_removed_email() {
        let mut repo = MockAdminRepository::new();
        repo.expect_delete_identity()
            .returning(|_| Ok(Some("a@x.com".to_string())));

        let service = AdminManager::new(Arc::new(repo));
        let deleted = service
            .delete_admin("65a1b2c3d4e5f60718293a4b")
            .await
            .unwrap();

        assert_eq!(deleted.message, ADMIN_DELETED);
        assert_eq!(deleted.deleted_admin_email, "a@x.com");
    }

    #[tokio::test]
    async fn seed_is_skipped_when_super_admin_exists() {
        let mut repo = MockAdminRepository::new();
        repo.expect_has_super_admin().returning(|| Ok(true));
        repo.expect_insert_account().never();

        let service = AdminManager::new(Arc::new(repo));
        let seeded = service
            .seed_super_admin("Root".into(), "root@x.com".into(), "password1".into())
            .await
            .unwrap();
        assert!(seeded.is_none());
    }
}
