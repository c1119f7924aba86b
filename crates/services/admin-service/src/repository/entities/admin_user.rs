//! AdminUser database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Membership, MembershipStatus, RecordId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub university: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Unknown stored statuses are read as `Pending`.
impl From<Model> for Membership {
    fn from(model: Model) -> Self {
        Membership {
            id: RecordId::from_trusted(model.id),
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            role: model.role,
            university: model.university,
            status: model
                .status
                .parse()
                .unwrap_or(MembershipStatus::Pending),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Membership> for ActiveModel {
    fn from(link: &Membership) -> Self {
        ActiveModel {
            id: Set(link.id.to_string()),
            name: Set(link.name.clone()),
            email: Set(link.email.clone()),
            password_hash: Set(link.password_hash.clone()),
            role: Set(link.role.clone()),
            university: Set(link.university.clone()),
            status: Set(link.status.to_string()),
            created_at: Set(link.created_at),
            updated_at: Set(link.updated_at),
        }
    }
}
