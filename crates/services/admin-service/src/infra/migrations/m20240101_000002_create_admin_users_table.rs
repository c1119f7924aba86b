//! Migration: Create the admin_users table holding per-university memberships.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminUsers::Id)
                            .char_len(24)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminUsers::Name).string().not_null())
                    .col(ColumnDef::new(AdminUsers::Email).string().not_null())
                    .col(ColumnDef::new(AdminUsers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(AdminUsers::Role).string().not_null())
                    .col(ColumnDef::new(AdminUsers::University).string().not_null())
                    .col(
                        ColumnDef::new(AdminUsers::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership per email and university
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_users_email_university")
                    .table(AdminUsers::Table)
                    .col(AdminUsers::Email)
                    .col(AdminUsers::University)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_users_university")
                    .table(AdminUsers::Table)
                    .col(AdminUsers::University)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminUsers {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    University,
    Status,
    CreatedAt,
    UpdatedAt,
}
