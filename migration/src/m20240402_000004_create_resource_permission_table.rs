use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_people_table::People;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ResourcePermission {
    Table,
    Id,
    UserId,
    Resource,
    Permission,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(ResourcePermission::Table)
                .if_not_exists()
                .col(ColumnDef::new(ResourcePermission::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(ResourcePermission::UserId).uuid().not_null())
                .col(ColumnDef::new(ResourcePermission::Resource).string_len(255).not_null())
                .col(ColumnDef::new(ResourcePermission::Permission).string_len(32).not_null())
                .col(ColumnDef::new(ResourcePermission::CreatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_resource_permission_user")
                        .from(ResourcePermission::Table, ResourcePermission::UserId)
                        .to(People::Table, People::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("uq_resource_permission")
                .table(ResourcePermission::Table)
                .col(ResourcePermission::UserId)
                .col(ResourcePermission::Resource)
                .col(ResourcePermission::Permission)
                .unique()
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(ResourcePermission::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
