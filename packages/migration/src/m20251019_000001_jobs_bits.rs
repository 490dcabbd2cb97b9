use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;
use sea_orm_migration::sea_query::{ColumnDef, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Jobs {
    Table,
    Id,
    EmployerEmail,
    Category,
    Document,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Bits {
    Table,
    Id,
    UserEmail,
    EmployerEmail,
    Status,
    Document,
    CreatedAt,
    UpdatedAt,
}

/// Sort columns compare by code point on every backend. SQLite's default
/// BINARY collation already does; Postgres needs `C`.
fn code_point_order(col: &mut ColumnDef, backend: DatabaseBackend) -> &mut ColumnDef {
    match backend {
        DatabaseBackend::Postgres => col.extra("COLLATE \"C\""),
        _ => col,
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // jobs
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Jobs::Id)
                            .string_len(26)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Jobs::EmployerEmail).string().not_null())
                    .col(code_point_order(
                        ColumnDef::new(Jobs::Category).string().null(),
                        backend,
                    ))
                    .col(ColumnDef::new(Jobs::Document).json().not_null())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_jobs_employer_email")
                    .table(Jobs::Table)
                    .col(Jobs::EmployerEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_jobs_category")
                    .table(Jobs::Table)
                    .col(Jobs::Category)
                    .to_owned(),
            )
            .await?;

        // bits
        manager
            .create_table(
                Table::create()
                    .table(Bits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bits::Id)
                            .string_len(26)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bits::UserEmail).string().not_null())
                    .col(ColumnDef::new(Bits::EmployerEmail).string().not_null())
                    .col(code_point_order(
                        ColumnDef::new(Bits::Status).string().null(),
                        backend,
                    ))
                    .col(ColumnDef::new(Bits::Document).json().not_null())
                    .col(
                        ColumnDef::new(Bits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_bits_user_email_status")
                    .table(Bits::Table)
                    .col(Bits::UserEmail)
                    .col(Bits::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_bits_employer_email")
                    .table(Bits::Table)
                    .col(Bits::EmployerEmail)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop indexes before their tables
        manager
            .drop_index(
                Index::drop()
                    .name("ix_bits_employer_email")
                    .table(Bits::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_bits_user_email_status")
                    .table(Bits::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Bits::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_jobs_category")
                    .table(Jobs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_jobs_employer_email")
                    .table(Jobs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Jobs::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
