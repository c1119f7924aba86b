//! Role database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use domain::{AdminAccount, AdminRole, RecordId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub role: String,
    pub university: Option<String>,
    pub is_active: bool,
    pub require_password_change: bool,
    pub failed_login_attempts: i32,
    pub last_password_change: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for AdminAccount {
    fn from(model: Model) -> Self {
        AdminAccount {
            id: RecordId::from_trusted(model.id),
            name: model.name,
            email: model.email,
            password_hash: model.password,
            role: AdminRole::from(model.role),
            university: model.university,
            is_active: model.is_active,
            require_password_change: model.require_password_change,
            failed_login_attempts: model.failed_login_attempts,
            last_password_change: model.last_password_change,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Every column set, for inserts
impl From<&AdminAccount> for ActiveModel {
    fn from(account: &AdminAccount) -> Self {
        ActiveModel {
            id: Set(account.id.to_string()),
            name: Set(account.name.clone()),
            email: Set(account.email.clone()),
            password: Set(account.password_hash.clone()),
            role: Set(account.role.to_string()),
            university: Set(account.university.clone()),
            is_active: Set(account.is_active),
            require_password_change: Set(account.require_password_change),
            failed_login_attempts: Set(account.failed_login_attempts),
            last_password_change: Set(account.last_password_change),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        }
    }
}

impl ActiveModel {
    /// Columns written when an existing account is saved. The failed login
    /// counter is left alone; it only changes through atomic updates.
    pub fn for_update(account: &AdminAccount) -> Self {
        ActiveModel {
            failed_login_attempts: NotSet,
            ..Self::from(account)
        }
    }
}
