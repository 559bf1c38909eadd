use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_people_table::People;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GroupProfile {
    Table,
    Id,
    Slug,
    Title,
    Access,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupMember {
    Table,
    GroupId,
    UserId,
    Role,
    JoinedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(GroupProfile::Table)
                .if_not_exists()
                .col(ColumnDef::new(GroupProfile::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(GroupProfile::Slug).string_len(255).not_null().unique_key())
                .col(ColumnDef::new(GroupProfile::Title).string_len(255).not_null())
                .col(ColumnDef::new(GroupProfile::Access).string_len(16).not_null().default("public"))
                .col(ColumnDef::new(GroupProfile::CreatedAt).timestamp_with_time_zone().not_null())
                .to_owned(),
        ).await?;

        // Membership join table; a user appears at most once per group
        m.create_table(
            Table::create()
                .table(GroupMember::Table)
                .if_not_exists()
                .col(ColumnDef::new(GroupMember::GroupId).uuid().not_null())
                .col(ColumnDef::new(GroupMember::UserId).uuid().not_null())
                .col(ColumnDef::new(GroupMember::Role).string_len(16).not_null().default("member"))
                .col(ColumnDef::new(GroupMember::JoinedAt).timestamp_with_time_zone().not_null())
                .primary_key(
                    Index::create()
                        .name("pk_group_member")
                        .col(GroupMember::GroupId)
                        .col(GroupMember::UserId)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_member_group")
                        .from(GroupMember::Table, GroupMember::GroupId)
                        .to(GroupProfile::Table, GroupProfile::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_member_user")
                        .from(GroupMember::Table, GroupMember::UserId)
                        .to(People::Table, People::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_group_member_user")
                .table(GroupMember::Table)
                .col(GroupMember::UserId)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(GroupMember::Table).if_exists().to_owned()).await?;
        m.drop_table(Table::drop().table(GroupProfile::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
