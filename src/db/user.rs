use crate::db::database_service::DatabaseService;
use crate::types::{
    autocomplete::PAGE_SIZE,
    error::AppError,
    user::{DBUserCreate, ProfileForm},
};
use crate::utils::token;
use chrono::Utc;
use entity::group::{self, GroupAccess};
use entity::group_member;
use entity::user::{ActiveModel as UserActive, Column, Entity as User, Model as UserModel};
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

/// `%term%` with LIKE metacharacters escaped, folded the way the backend's `lower()` folds.
/// SQLite only lowercases ASCII, so non-ASCII letters there match case-sensitively.
fn contains_pattern(term: &str, backend: DbBackend) -> String {
    let folded = match backend {
        DbBackend::Sqlite => term.to_ascii_lowercase(),
        _ => term.to_lowercase(),
    };
    let mut escaped = String::with_capacity(folded.len() + 2);
    escaped.push('%');
    for c in folded.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn member_ids_of_groups(groups: SelectStatement) -> SelectStatement {
    Query::select()
        .column(group_member::Column::UserId)
        .from(group_member::Entity)
        .and_where(group_member::Column::GroupId.in_subquery(groups))
        .to_owned()
}

impl DatabaseService {
    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(User::find()
            .filter(Column::Username.eq(username))
            .count(&self.db)
            .await?
            > 0)
    }

    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<UserModel, AppError> {
        Ok(User::find_by_id(*id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    /// Inactive accounts resolve the same way as missing ones.
    pub async fn get_active_user_by_username(&self, username: &str) -> Result<UserModel, AppError> {
        Ok(User::find()
            .filter(Column::Username.eq(username))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    pub async fn list_active_users_by_email(&self, email: &str) -> Result<Vec<UserModel>, AppError> {
        Ok(User::find()
            .filter(Column::Email.eq(email))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await?)
    }

    pub async fn create_user(&self, payload: DBUserCreate) -> Result<UserModel, AppError> {
        if self.username_exists(&payload.username).await? {
            return Err(AppError::AlreadyExists);
        }
        let now = Utc::now();

        let user = UserActive {
            id: Set(token::new_id()),
            username: Set(payload.username),
            email: Set(payload.email),
            first_name: Set(payload.first_name),
            last_name: Set(payload.last_name),
            password_hash: Set(payload.password_hash),
            is_active: Set(true),
            is_superuser: Set(payload.is_superuser),
            organization: Set(None),
            position: Set(None),
            voice: Set(None),
            city: Set(None),
            country: Set(None),
            profile: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn set_user_active(&self, user_id: Uuid, active: bool) -> Result<(), AppError> {
        let mut am: UserActive = self.get_user_by_id(&user_id).await?.into();
        am.is_active = Set(active);
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.db).await.map(|_| ())?)
    }

    /// Writes the submitted fields only; absent fields keep their stored value.
    pub async fn update_profile(&self, user: UserModel, form: ProfileForm) -> Result<UserModel, AppError> {
        let original = user.clone();
        let mut am: UserActive = user.into();
        if let Some(v) = form.first_name {
            am.first_name = Set(v);
        }
        if let Some(v) = form.last_name {
            am.last_name = Set(v);
        }
        if let Some(v) = form.email {
            am.email = Set(v);
        }
        if let Some(v) = form.organization {
            am.organization = Set(Some(v));
        }
        if let Some(v) = form.position {
            am.position = Set(Some(v));
        }
        if let Some(v) = form.voice {
            am.voice = Set(Some(v));
        }
        if let Some(v) = form.city {
            am.city = Set(Some(v));
        }
        if let Some(v) = form.country {
            am.country = Set(Some(v));
        }
        if let Some(v) = form.profile {
            am.profile = Set(Some(v));
        }
        if !am.is_changed() {
            return Ok(original);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.db).await?)
    }

    /// Users the caller may see in search and pickers.
    ///
    /// Superusers see everyone. Anyone else sees active members of public groups,
    /// and when signed in also themselves and the members of their own groups.
    pub fn available_users(&self, caller: Option<&UserModel>) -> Select<User> {
        if let Some(u) = caller.filter(|u| u.is_superuser) {
            log::debug!("available users: superuser {} sees all", u.username);
            return User::find();
        }

        let public_groups = Query::select()
            .column(group::Column::Id)
            .from(group::Entity)
            .and_where(group::Column::Access.eq(GroupAccess::Public))
            .to_owned();

        let mut visible = Condition::any().add(Column::Id.in_subquery(member_ids_of_groups(public_groups)));

        if let Some(caller) = caller {
            let own_groups = Query::select()
                .column(group_member::Column::GroupId)
                .from(group_member::Entity)
                .and_where(group_member::Column::UserId.eq(caller.id))
                .to_owned();

            visible = visible
                .add(Column::Id.eq(caller.id))
                .add(Column::Id.in_subquery(member_ids_of_groups(own_groups)));
        }

        User::find().filter(Column::IsActive.eq(true)).filter(visible)
    }

    /// One page of the caller-visible users matching `term` in username, email or names.
    /// Returns the page and whether another page follows.
    pub async fn autocomplete_users(
        &self,
        caller: Option<&UserModel>,
        term: Option<&str>,
        page: u64,
    ) -> Result<(Vec<UserModel>, bool), AppError> {
        // past the last page a SQL offset can express, there is nothing to list
        let offset = match page
            .checked_mul(PAGE_SIZE)
            .filter(|offset| *offset <= i64::MAX as u64 - PAGE_SIZE)
        {
            Some(offset) => offset,
            None => return Ok((Vec::new(), false)),
        };

        let mut query = self.available_users(caller);

        if let Some(term) = term {
            let pattern = contains_pattern(term, self.db.get_database_backend());
            let icontains = |col: Column| {
                Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            query = query.filter(
                Condition::any()
                    .add(icontains(Column::Username))
                    .add(icontains(Column::Email))
                    .add(icontains(Column::FirstName))
                    .add(icontains(Column::LastName)),
            );
        }

        let mut users = query
            .order_by_asc(Column::Username)
            .offset(offset)
            .limit(PAGE_SIZE + 1)
            .all(&self.db)
            .await?;

        let more = users.len() as u64 > PAGE_SIZE;
        users.truncate(PAGE_SIZE as usize);
        Ok((users, more))
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;
    use sea_orm::DbBackend;

    #[test]
    fn pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("Ann", DbBackend::Postgres), "%ann%");
        assert_eq!(contains_pattern("50%_off", DbBackend::Postgres), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b", DbBackend::Sqlite), "%a\\\\b%");
    }

    #[test]
    fn pattern_folds_like_the_backend() {
        assert_eq!(contains_pattern("ÉMILE", DbBackend::Postgres), "%émile%");
        assert_eq!(contains_pattern("ÉMILE", DbBackend::Sqlite), "%Émile%");
    }
}
