use actix_web::{get, post, web};
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;

use crate::config::config;
use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::form::{bind, BoundForm};
use crate::types::response::{PageResponse, PageResult};
use crate::types::token::IssuedToken;
use crate::types::user::{LoginForm, ProfileView};
use crate::utils::templates::{Templates, LOGIN};
use crate::utils::token::verify_password;

pub const LOGIN_FAILED: &str = "The username and/or password you specified are not correct.";

#[derive(Serialize, Default)]
struct LoginContext {
    form: Option<BoundForm<LoginForm>>,
    error: Option<&'static str>,
    profile: Option<ProfileView>,
    access_token: Option<IssuedToken>,
}

#[get("/login/")]
async fn login_form(templates: web::Data<Templates>) -> PageResult {
    let ctx = LoginContext { form: Some(BoundForm::unbound(LoginForm::default())), ..Default::default() };
    Ok(PageResponse::Html(templates.render(LOGIN, &ctx)?))
}

#[post("/login/")]
async fn login_submit(
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    body: web::Form<LoginForm>,
) -> PageResult {
    let form = bind(body.into_inner());
    if !form.is_valid() {
        let ctx = LoginContext { form: Some(form), ..Default::default() };
        return Ok(PageResponse::Html(templates.render(LOGIN, &ctx)?));
    }

    let user = match db.get_active_user_by_username(&form.data.username).await {
        Ok(user) => Some(user),
        Err(AppError::NotFound) => None,
        Err(e) => return Err(e),
    };
    let verified = match &user {
        Some(u) => verify_password(&form.data.password, &u.password_hash).unwrap_or_else(|e| {
            log::warn!("stored password hash for {} is unreadable: {e}", u.username);
            false
        }),
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            log::info!("failed sign in for {}", form.data.username);
            let ctx = LoginContext { form: Some(form), error: Some(LOGIN_FAILED), ..Default::default() };
            return Ok(PageResponse::Html(templates.render(LOGIN, &ctx)?));
        }
    };

    let token = db
        .create_access_token(user.id, Duration::seconds(config().access_token_expire_seconds))
        .await?;

    let ctx = LoginContext {
        profile: Some(ProfileView::from(&user)),
        access_token: Some(token.into()),
        ..Default::default()
    };
    Ok(PageResponse::Html(templates.render(LOGIN, &ctx)?))
}
