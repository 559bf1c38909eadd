use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(People::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                    )
                    .col(
                        ColumnDef::new(People::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key()
                    )
                    .col(ColumnDef::new(People::Email).string_len(254).not_null())
                    .col(ColumnDef::new(People::FirstName).string_len(150).not_null().default(""))
                    .col(ColumnDef::new(People::LastName).string_len(150).not_null().default(""))
                    .col(ColumnDef::new(People::PasswordHash).string().not_null())
                    .col(ColumnDef::new(People::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(People::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(People::Organization).string_len(255).null())
                    .col(ColumnDef::new(People::Position).string_len(255).null())
                    .col(ColumnDef::new(People::Voice).string_len(255).null())
                    .col(ColumnDef::new(People::City).string_len(255).null())
                    .col(ColumnDef::new(People::Country).string_len(255).null())
                    .col(ColumnDef::new(People::Profile).text().null())
                    .col(
                        ColumnDef::new(People::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                    )
                    .col(
                        ColumnDef::new(People::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                    )
                    .to_owned()
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_people_email")
                    .table(People::Table)
                    .col(People::Email)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(People::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum People {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    IsActive,
    IsSuperuser,
    Organization,
    Position,
    Voice,
    City,
    Country,
    Profile,
    CreatedAt,
    UpdatedAt,
}
