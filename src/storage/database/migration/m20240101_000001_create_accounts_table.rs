use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::Category).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::VerificationCode).string().null())
                    .col(
                        ColumnDef::new(Accounts::VerificationExpires)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Accounts::FirstName).string().not_null())
                    .col(ColumnDef::new(Accounts::LastName).string().not_null())
                    .col(ColumnDef::new(Accounts::DocumentId).string().not_null())
                    .col(ColumnDef::new(Accounts::Address).string().not_null())
                    .col(ColumnDef::new(Accounts::PostalCode).string().not_null())
                    .col(ColumnDef::new(Accounts::Province).string().not_null())
                    .col(ColumnDef::new(Accounts::Locality).string().not_null())
                    .col(ColumnDef::new(Accounts::Country).string().not_null())
                    .col(ColumnDef::new(Accounts::Phone).string().not_null())
                    .col(ColumnDef::new(Accounts::JoinedOn).date().not_null())
                    .col(ColumnDef::new(Accounts::LeftOn).date().null())
                    .col(ColumnDef::new(Accounts::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Accounts::Fee).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Accounts::Membership)
                            .string()
                            .not_null()
                            .default("NoSocio"),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Purge sweep scans unverified rows by expiry
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_accounts_verification_expires")
                    .table(Accounts::Table)
                    .col(Accounts::VerificationExpires)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Email,
    PasswordHash,
    Category,
    IsVerified,
    VerificationCode,
    VerificationExpires,
    FirstName,
    LastName,
    DocumentId,
    Address,
    PostalCode,
    Province,
    Locality,
    Country,
    Phone,
    JoinedOn,
    LeftOn,
    PaymentMethod,
    Fee,
    Membership,
    CreatedAt,
    UpdatedAt,
}
