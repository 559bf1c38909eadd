use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use chrono::Utc;
use entity::group::{ActiveModel as GroupActive, Column, Entity as Group, GroupAccess, Model as GroupModel};
use entity::group_member::{self, ActiveModel as MemberActive, Entity as GroupMember, MemberRole};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set};
use uuid::Uuid;

impl DatabaseService {
    pub async fn create_group(&self, slug: &str, title: &str, access: GroupAccess) -> Result<GroupModel, AppError> {
        if Group::find().filter(Column::Slug.eq(slug)).count(&self.db).await? > 0 {
            return Err(AppError::AlreadyExists);
        }
        Ok(GroupActive {
            id: Set(Uuid::new_v4()),
            slug: Set(slug.to_string()),
            title: Set(title.to_string()),
            access: Set(access),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn add_group_member(&self, group_id: Uuid, user_id: Uuid, role: MemberRole) -> Result<(), AppError> {
        let exists = GroupMember::find_by_id((group_id, user_id)).one(&self.db).await?;
        if exists.is_some() {
            return Err(AppError::AlreadyExists);
        }
        MemberActive {
            group_id: Set(group_id),
            user_id: Set(user_id),
            role: Set(role),
            joined_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    pub async fn get_groups_by_slugs(&self, slugs: &[String]) -> Result<Vec<GroupModel>, AppError> {
        Ok(Group::find()
            .filter(Column::Slug.is_in(slugs.iter().cloned()))
            .all(&self.db)
            .await?)
    }

    pub async fn list_group_member_ids(&self, group_ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
        let mut ids: Vec<Uuid> = GroupMember::find()
            .select_only()
            .column(group_member::Column::UserId)
            .filter(group_member::Column::GroupId.is_in(group_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
