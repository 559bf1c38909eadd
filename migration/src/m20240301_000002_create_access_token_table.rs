use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_people_table::People;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum AccessToken {
    Table,
    Id,
    UserId,
    Token,
    Expires,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(AccessToken::Table)
                .if_not_exists()
                .col(ColumnDef::new(AccessToken::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(AccessToken::UserId).uuid().not_null())
                .col(ColumnDef::new(AccessToken::Token).string().not_null().unique_key())
                .col(ColumnDef::new(AccessToken::Expires).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(AccessToken::CreatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_access_token_user")
                        .from(AccessToken::Table, AccessToken::UserId)
                        .to(People::Table, People::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_access_token_user")
                .table(AccessToken::Table)
                .col(AccessToken::UserId)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(AccessToken::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
