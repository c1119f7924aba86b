//! In-memory admin repository.
//!
//! Mirrors the unique constraints of the SQL schema so service and API tests
//! exercise the same conflict paths without a database.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::AdminRepository;
use crate::types::PageParams;
use common::{AppError, AppResult};
use domain::{AdminAccount, AdminIdentity, Membership, RecordId, SyncPlan};

const DUPLICATE_RECORD: &str = "A record with this email already exists";

#[derive(Default, Clone)]
struct Tables {
    accounts: Vec<AdminAccount>,
    memberships: Vec<Membership>,
}

impl Tables {
    fn identity(&self, account: &AdminAccount) -> AdminIdentity {
        let memberships = self
            .memberships
            .iter()
            .filter(|m| m.email == account.email)
            .cloned()
            .collect();
        AdminIdentity::new(account.clone(), memberships)
    }

    fn check_unique(&self) -> AppResult<()> {
        for (i, account) in self.accounts.iter().enumerate() {
            if self.accounts[..i].iter().any(|a| a.email == account.email) {
                return Err(AppError::conflict(DUPLICATE_RECORD));
            }
        }
        for (i, link) in self.memberships.iter().enumerate() {
            if self.memberships[..i]
                .iter()
                .any(|m| m.email == link.email && m.university == link.university)
            {
                return Err(AppError::conflict(DUPLICATE_RECORD));
            }
        }
        Ok(())
    }

    fn upsert_membership(&mut self, link: &Membership) {
        match self.memberships.iter_mut().find(|m| m.id == link.id) {
            Some(existing) => *existing = link.clone(),
            None => self.memberships.push(link.clone()),
        }
    }
}

/// In-memory admin store
#[derive(Default)]
pub struct MemoryAdminStore {
    tables: RwLock<Tables>,
}

impl MemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a membership directly (for test setup)
    pub async fn insert_membership(&self, link: Membership) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.memberships.push(link);
        if let Err(e) = tables.check_unique() {
            tables.memberships.pop();
            return Err(e);
        }
        Ok(())
    }

    /// All memberships for an email (for test assertions)
    pub async fn memberships_for(&self, email: &str) -> Vec<Membership> {
        self.tables
            .read()
            .await
            .memberships
            .iter()
            .filter(|m| m.email == email)
            .cloned()
            .collect()
    }

    /// Look up an account without its memberships (for test assertions)
    pub async fn account(&self, id: &RecordId) -> Option<AdminAccount> {
        self.tables
            .read()
            .await
            .accounts
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }

    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }
}

#[async_trait]
impl AdminRepository for MemoryAdminStore {
    async fn find_identity(&self, id: &RecordId) -> AppResult<Option<AdminIdentity>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| &a.id == id)
            .map(|a| tables.identity(a)))
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AdminAccount>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn email_taken(&self, email: &str, except: &RecordId) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .any(|a| a.email == email && &a.id != except))
    }

    async fn insert_account(&self, account: &AdminAccount) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::conflict(DUPLICATE_RECORD));
        }
        tables.accounts.push(account.clone());
        Ok(())
    }

    async fn save_identity(&self, identity: &AdminIdentity, plan: &SyncPlan) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        // Work on a copy so a constraint violation leaves nothing behind
        let mut staged = (*tables).clone();

        if plan.account_changed {
            let account = staged
                .accounts
                .iter_mut()
                .find(|a| a.id == identity.account.id)
                .ok_or_else(|| AppError::internal("Account disappeared during update"))?;
            // The failed login counter only moves through its own updates
            let failed_login_attempts = account.failed_login_attempts;
            *account = AdminAccount {
                failed_login_attempts,
                ..identity.account.clone()
            };
        }
        for link in &identity.memberships {
            if plan.created.contains(&link.id) || plan.updated.contains(&link.id) {
                staged.upsert_membership(link);
            }
        }

        staged.check_unique()?;
        *tables = staged;
        Ok(())
    }

    async fn delete_identity(&self, id: &RecordId) -> AppResult<Option<String>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.accounts.iter().position(|a| &a.id == id) else {
            return Ok(None);
        };

        let account = tables.accounts.remove(index);
        tables.memberships.retain(|m| m.email != account.email);
        Ok(Some(account.email))
    }

    async fn list_by_university(
        &self,
        university: &str,
        page: PageParams,
    ) -> AppResult<Vec<AdminIdentity>> {
        let tables = self.tables.read().await;

        let mut matches: Vec<AdminIdentity> = tables
            .accounts
            .iter()
            .filter(|a| a.role.is_admin())
            .map(|a| tables.identity(a))
            .filter(|identity| identity.belongs_to(university))
            .collect();
        matches.sort_by(|a, b| {
            b.account
                .created_at
                .cmp(&a.account.created_at)
                .then_with(|| b.account.id.cmp(&a.account.id))
        });

        Ok(matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn has_super_admin(&self) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.iter().any(|a| a.role.is_super_admin()))
    }

    async fn record_failed_login(&self, id: &RecordId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(account) = tables.accounts.iter_mut().find(|a| &a.id == id) {
            account.failed_login_attempts += 1;
        }
        Ok(())
    }

    async fn reset_failed_logins(&self, id: &RecordId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(account) = tables.accounts.iter_mut().find(|a| &a.id == id) {
            account.failed_login_attempts = 0;
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
