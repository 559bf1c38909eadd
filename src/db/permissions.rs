use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::permission::{PermissionMode, PermissionType};
use chrono::Utc;
use entity::resource_permission::{ActiveModel as PermActive, Column, Entity as ResourcePermission, Model as PermModel};
use entity::user::{self, Entity as User};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

impl DatabaseService {
    pub async fn get_users_by_usernames(&self, usernames: &[String]) -> Result<Vec<user::Model>, AppError> {
        Ok(User::find()
            .filter(user::Column::Username.is_in(usernames.iter().cloned()))
            .all(&self.db)
            .await?)
    }

    /// Grants or revokes `permission` on every resource for every user in one transaction.
    /// Returns how many rows were written or removed.
    pub async fn apply_permission_change(
        &self,
        user_ids: &[Uuid],
        resources: &[String],
        permission: PermissionType,
        mode: PermissionMode,
    ) -> Result<u64, AppError> {
        let txn = self.db.begin().await?;
        let mut touched = 0u64;

        match mode {
            PermissionMode::Set => {
                for user_id in user_ids {
                    for resource in resources {
                        let exists = ResourcePermission::find()
                            .filter(Column::UserId.eq(*user_id))
                            .filter(Column::Resource.eq(resource.as_str()))
                            .filter(Column::Permission.eq(permission.as_str()))
                            .count(&txn)
                            .await?
                            > 0;
                        if exists {
                            continue;
                        }
                        PermActive {
                            id: Set(Uuid::new_v4()),
                            user_id: Set(*user_id),
                            resource: Set(resource.clone()),
                            permission: Set(permission.as_str().to_string()),
                            created_at: Set(Utc::now()),
                        }
                        .insert(&txn)
                        .await?;
                        touched += 1;
                    }
                }
            }
            PermissionMode::Unset => {
                let res = ResourcePermission::delete_many()
                    .filter(Column::UserId.is_in(user_ids.iter().copied()))
                    .filter(Column::Resource.is_in(resources.iter().cloned()))
                    .filter(Column::Permission.eq(permission.as_str()))
                    .exec(&txn)
                    .await?;
                touched = res.rows_affected;
            }
        }

        txn.commit().await?;
        Ok(touched)
    }

    pub async fn list_user_permissions(&self, user_id: Uuid) -> Result<Vec<PermModel>, AppError> {
        Ok(ResourcePermission::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Resource)
            .order_by_asc(Column::Permission)
            .all(&self.db)
            .await?)
    }
}
