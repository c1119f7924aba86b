//! Admin repository backed by SeaORM.
//!
//! Accounts live in `roles`, memberships in `admin_users`; the two are joined
//! by email. Multi-row writes run in a single ReadCommitted transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Query},
    AccessMode, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IsolationLevel, QueryFilter, QueryOrder, QuerySelect,
    Statement, TransactionTrait,
};

use super::entities::admin_user::{self, Entity as AdminUserEntity};
use super::entities::role::{self, Entity as RoleEntity};
use crate::types::PageParams;
use common::AppResult;
use domain::{
    AdminAccount, AdminIdentity, Membership, RecordId, SyncPlan, ROLE_ADMIN, ROLE_SUPER_ADMIN,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Admin repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Load an account and its memberships by account id
    async fn find_identity(&self, id: &RecordId) -> AppResult<Option<AdminIdentity>>;

    /// Find an account by (normalized) email, whatever its role
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AdminAccount>>;

    /// Whether an account other than `except` uses `email`
    async fn email_taken(&self, email: &str, except: &RecordId) -> AppResult<bool>;

    /// Insert a brand new account
    async fn insert_account(&self, account: &AdminAccount) -> AppResult<()>;

    /// Persist the records listed in `plan` atomically
    async fn save_identity(&self, identity: &AdminIdentity, plan: &SyncPlan) -> AppResult<()>;

    /// Remove an account and every membership sharing its email.
    /// Returns the removed email, or `None` if the account does not exist.
    async fn delete_identity(&self, id: &RecordId) -> AppResult<Option<String>>;

    /// Admins tied to `university`, newest first
    async fn list_by_university(
        &self,
        university: &str,
        page: PageParams,
    ) -> AppResult<Vec<AdminIdentity>>;

    /// Whether at least one super-admin account exists
    async fn has_super_admin(&self) -> AppResult<bool>;

    /// Atomically add one to the failed login counter
    async fn record_failed_login(&self, id: &RecordId) -> AppResult<()>;

    /// Reset the failed login counter to zero
    async fn reset_failed_logins(&self, id: &RecordId) -> AppResult<()>;

    /// Check storage connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of AdminRepository
pub struct AdminStore {
    db: DatabaseConnection,
}

impl AdminStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        Ok(self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?)
    }
}

/// Commit on success, roll back on error.
async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn memberships_of<C: ConnectionTrait>(db: &C, email: &str) -> Result<Vec<Membership>, DbErr> {
    let models = AdminUserEntity::find()
        .filter(admin_user::Column::Email.eq(email))
        .all(db)
        .await?;
    Ok(models.into_iter().map(Membership::from).collect())
}

async fn write_plan(
    txn: &DatabaseTransaction,
    identity: &AdminIdentity,
    plan: &SyncPlan,
) -> AppResult<()> {
    if plan.account_changed {
        role::ActiveModel::for_update(&identity.account)
            .update(txn)
            .await?;
    }

    for link in &identity.memberships {
        if plan.created.contains(&link.id) {
            admin_user::ActiveModel::from(link).insert(txn).await?;
        } else if plan.updated.contains(&link.id) {
            admin_user::ActiveModel::from(link).update(txn).await?;
        }
    }

    Ok(())
}

async fn delete_cascade(txn: &DatabaseTransaction, id: &RecordId) -> AppResult<Option<String>> {
    let Some(account) = RoleEntity::find_by_id(id.as_str()).one(txn).await? else {
        return Ok(None);
    };

    let links = AdminUserEntity::delete_many()
        .filter(admin_user::Column::Email.eq(account.email.as_str()))
        .exec(txn)
        .await?;
    RoleEntity::delete_by_id(account.id.as_str()).exec(txn).await?;

    tracing::debug!(
        email = %account.email,
        memberships = links.rows_affected,
        "Deleted admin identity"
    );
    Ok(Some(account.email))
}

#[async_trait]
impl AdminRepository for AdminStore {
    async fn find_identity(&self, id: &RecordId) -> AppResult<Option<AdminIdentity>> {
        let Some(model) = RoleEntity::find_by_id(id.as_str()).one(&self.db).await? else {
            return Ok(None);
        };

        let memberships = memberships_of(&self.db, &model.email).await?;
        Ok(Some(AdminIdentity::new(model.into(), memberships)))
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AdminAccount>> {
        let result = RoleEntity::find()
            .filter(role::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(AdminAccount::from))
    }

    async fn email_taken(&self, email: &str, except: &RecordId) -> AppResult<bool> {
        let result = RoleEntity::find()
            .filter(role::Column::Email.eq(email))
            .filter(role::Column::Id.ne(except.as_str()))
            .one(&self.db)
            .await?;

        Ok(result.is_some())
    }

    async fn insert_account(&self, account: &AdminAccount) -> AppResult<()> {
        role::ActiveModel::from(account).insert(&self.db).await?;
        Ok(())
    }

    async fn save_identity(&self, identity: &AdminIdentity, plan: &SyncPlan) -> AppResult<()> {
        if plan.is_empty() {
            return Ok(());
        }

        let txn = self.begin().await?;
        let result = write_plan(&txn, identity, plan).await;
        finish(txn, result).await
    }

    async fn delete_identity(&self, id: &RecordId) -> AppResult<Option<String>> {
        let txn = self.begin().await?;
        let result = delete_cascade(&txn, id).await;
        finish(txn, result).await
    }

    async fn list_by_university(
        &self,
        university: &str,
        page: PageParams,
    ) -> AppResult<Vec<AdminIdentity>> {
        let member_emails = Query::select()
            .column(admin_user::Column::Email)
            .from(AdminUserEntity)
            .and_where(admin_user::Column::University.eq(university))
            .to_owned();

        let accounts = RoleEntity::find()
            .filter(role::Column::Role.is_in([ROLE_ADMIN, ROLE_SUPER_ADMIN]))
            .filter(
                Condition::any()
                    .add(role::Column::University.eq(university))
                    .add(role::Column::Email.in_subquery(member_emails)),
            )
            .order_by_desc(role::Column::CreatedAt)
            .order_by_desc(role::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let emails: Vec<String> = accounts.iter().map(|a| a.email.clone()).collect();
        let links = AdminUserEntity::find()
            .filter(admin_user::Column::Email.is_in(emails))
            .all(&self.db)
            .await?;

        let mut by_email: HashMap<String, Vec<Membership>> = HashMap::new();
        for link in links {
            by_email
                .entry(link.email.clone())
                .or_default()
                .push(Membership::from(link));
        }

        Ok(accounts
            .into_iter()
            .map(|model| {
                let memberships = by_email.remove(&model.email).unwrap_or_default();
                AdminIdentity::new(model.into(), memberships)
            })
            .collect())
    }

    async fn has_super_admin(&self) -> AppResult<bool> {
        let result = RoleEntity::find()
            .filter(role::Column::Role.eq(ROLE_SUPER_ADMIN))
            .one(&self.db)
            .await?;

        Ok(result.is_some())
    }

    async fn record_failed_login(&self, id: &RecordId) -> AppResult<()> {
        RoleEntity::update_many()
            .col_expr(
                role::Column::FailedLoginAttempts,
                Expr::col(role::Column::FailedLoginAttempts).add(1),
            )
            .filter(role::Column::Id.eq(id.as_str()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn reset_failed_logins(&self, id: &RecordId) -> AppResult<()> {
        RoleEntity::update_many()
            .col_expr(role::Column::FailedLoginAttempts, Expr::value(0))
            .filter(role::Column::Id.eq(id.as_str()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
