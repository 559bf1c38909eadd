use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::utils::token::{new_id, new_token};
use chrono::{DateTime, Duration, Utc};
use entity::access_token::{ActiveModel as TokenActive, Column, Entity as AccessToken, Model as TokenModel};
use entity::user::{Entity as User, Model as UserModel};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

impl DatabaseService {
    pub async fn create_access_token(&self, user_id: Uuid, ttl: Duration) -> Result<TokenModel, AppError> {
        let now = Utc::now();
        Ok(TokenActive {
            id: Set(new_id()),
            user_id: Set(user_id),
            token: Set(new_token()),
            expires: Set(now + ttl),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?)
    }

    /// The most recently issued token, expired or not.
    pub async fn latest_access_token(&self, user_id: Uuid) -> Result<Option<TokenModel>, AppError> {
        Ok(AccessToken::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Expires)
            .one(&self.db)
            .await?)
    }

    /// Returns the user's newest token, issuing one when none exists yet.
    /// Store failures are logged and reported as `None`.
    pub async fn get_or_create_token(&self, user: &UserModel, ttl: Duration) -> Option<TokenModel> {
        let existing = match self.latest_access_token(user.id).await {
            Ok(existing) => existing,
            Err(e) => {
                log::error!("looking up access token for {} failed: {e}", user.username);
                return None;
            }
        };
        if existing.is_some() {
            return existing;
        }

        match self.create_access_token(user.id, ttl).await {
            Ok(token) => Some(token),
            Err(e) => {
                log::error!("issuing access token for {} failed: {e}", user.username);
                None
            }
        }
    }

    /// Resolves a bearer value to its live token and active owner.
    pub async fn find_user_by_token(&self, token: &str) -> Result<(TokenModel, UserModel), AppError> {
        let (token, user) = AccessToken::find()
            .filter(Column::Token.eq(token))
            .find_also_related(User)
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = user.ok_or(AppError::Unauthorized)?;
        if token.is_expired() || !user.is_active {
            return Err(AppError::Unauthorized);
        }
        Ok((token, user))
    }

    pub async fn set_token_expiry(&self, token_id: Uuid, expires: DateTime<Utc>) -> Result<(), AppError> {
        let mut am: TokenActive = AccessToken::find_by_id(token_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Token not found".into()))?
            .into();
        am.expires = Set(expires);
        Ok(am.update(&self.db).await.map(|_| ())?)
    }

    /// Ends the session backed by `token`. Unknown tokens are an error.
    pub async fn revoke_access_token(&self, token: &str) -> Result<(), AppError> {
        let res = AccessToken::delete_many()
            .filter(Column::Token.eq(token))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
