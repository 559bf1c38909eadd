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
use crate::types::user::{DBUserCreate, ProfileView, SignupForm};
use crate::utils::templates::{Templates, SIGNUP, SIGNUP_DONE};
use crate::utils::token::hash_password;

#[derive(Serialize)]
struct SignupContext {
    account_geonode_local_signup: bool,
    form: BoundForm<SignupForm>,
}

#[derive(Serialize)]
struct SignupDoneContext {
    profile: ProfileView,
    access_token: IssuedToken,
}

fn render_form(templates: &Templates, form: BoundForm<SignupForm>) -> PageResult {
    let html = templates.render(
        SIGNUP,
        &SignupContext { account_geonode_local_signup: config().account.local_signup, form },
    )?;
    Ok(PageResponse::Html(html))
}

#[get("/signup/")]
async fn signup_form(templates: web::Data<Templates>) -> PageResult {
    render_form(&templates, BoundForm::unbound(SignupForm::default()))
}

#[post("/signup/")]
async fn signup_submit(
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    body: web::Form<SignupForm>,
) -> PageResult {
    let cfg = config();
    if !cfg.account.local_signup {
        return Err(AppError::Forbidden("Local signup is disabled".to_string()));
    }

    let mut form = bind(body.into_inner());
    if form.data.password1 != form.data.password2 {
        form.errors.add("password2", "You must type the same password each time.");
    }
    if form.errors.get("username").is_none() && db.username_exists(&form.data.username).await? {
        form.errors.add("username", "A user with that username already exists.");
    }
    if !form.is_valid() {
        return render_form(&templates, form);
    }

    let password_hash = hash_password(&form.data.password1)
        .map_err(|e| AppError::Internal(format!("hashing password failed: {e}")))?;

    let user = match db
        .create_user(DBUserCreate {
            username: form.data.username.clone(),
            email: form.data.email.clone(),
            first_name: form.data.first_name.clone(),
            last_name: form.data.last_name.clone(),
            password_hash,
            is_superuser: false,
        })
        .await
    {
        Ok(user) => user,
        // a concurrent signup took the name between the check above and the insert
        Err(AppError::AlreadyExists) => {
            form.errors.add("username", "A user with that username already exists.");
            return render_form(&templates, form);
        }
        Err(e) => return Err(e),
    };
    log::info!("new account {}", user.username);

    let token = db
        .create_access_token(user.id, Duration::seconds(cfg.access_token_expire_seconds))
        .await?;

    let html = templates.render(
        SIGNUP_DONE,
        &SignupDoneContext { profile: ProfileView::from(&user), access_token: token.into() },
    )?;
    Ok(PageResponse::CreatedHtml(html))
}
