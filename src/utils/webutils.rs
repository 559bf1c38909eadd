use actix_web::{
    dev::{Payload, ServiceRequest},
    error::ErrorInternalServerError,
    http::header::AUTHORIZATION,
    web, FromRequest, HttpMessage, HttpRequest,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use entity::user::Model as UserModel;
use std::{future::Future, pin::Pin, sync::Arc};

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::utils::token::looks_like_token;

/// The authenticated caller and the token they presented.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: UserModel,
    pub token: String,
}

/// Location header value for a page that shows `notice` once.
pub fn with_notice(path: &str, notice: &str) -> String {
    format!("{path}?notice={}", urlencoding::encode(notice))
}

pub fn profile_detail_path(username: &str) -> String {
    format!("/people/profile/{}/", urlencoding::encode(username))
}

/// Raw bearer value of the request, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

async fn resolve(db: &DatabaseService, token: &str) -> Result<CurrentUser, AppError> {
    if !looks_like_token(token) {
        return Err(AppError::Unauthorized);
    }
    let (token, user) = db.find_user_by_token(token).await?;
    Ok(CurrentUser { user, token: token.token })
}

/// Middleware validator for routes that require a signed-in caller.
pub async fn validate_token(req: ServiceRequest, credentials: BearerAuth) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let db = match req.app_data::<web::Data<Arc<DatabaseService>>>() {
        Some(db) => db.clone(),
        None => return Err((ErrorInternalServerError("database not configured"), req)),
    };

    match resolve(&db, credentials.token()).await {
        Ok(current) => {
            req.extensions_mut().insert(current);
            Ok(req)
        }
        Err(e) => Err((e.into(), req)),
    }
}

/// Optional caller for pages anonymous visitors may also open.
/// A missing, malformed or stale token just means "anonymous".
pub struct Caller(pub Option<CurrentUser>);

impl Caller {
    pub fn user(&self) -> Option<&UserModel> {
        self.0.as_ref().map(|c| &c.user)
    }
}

impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let db = req.app_data::<web::Data<Arc<DatabaseService>>>().cloned();

        Box::pin(async move {
            let (Some(token), Some(db)) = (token, db) else {
                return Ok(Caller(None));
            };
            match resolve(&db, &token).await {
                Ok(current) => Ok(Caller(Some(current))),
                Err(AppError::Unauthorized) => Ok(Caller(None)),
                Err(e) => Err(e.into()),
            }
        })
    }
}
