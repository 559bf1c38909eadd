use actix_web::{get, post, web};
use serde::Serialize;
use std::sync::Arc;

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::form::{bind, BoundForm, FormErrors};
use crate::types::response::{PageResponse, PageResult};
use crate::types::user::{ProfileForm, ProfileView};
use crate::utils::templates::{Templates, PROFILE_EDIT};
use crate::utils::webutils::{profile_detail_path, with_notice, CurrentUser};

pub const FORBIDDEN_MESSAGE: &str = "You are not allowed to edit other users profile";

/// What arrived with the request. A POST body that is not a form still counts as a submission.
enum Submission {
    Empty,
    Form(ProfileForm),
    Malformed,
}

impl From<Option<web::Form<ProfileForm>>> for Submission {
    fn from(body: Option<web::Form<ProfileForm>>) -> Self {
        match body {
            Some(form) => Submission::Form(form.into_inner()),
            None => Submission::Malformed,
        }
    }
}

#[derive(Serialize)]
struct EditContext {
    profile: ProfileView,
    form: BoundForm<ProfileForm>,
}

async fn profile_edit(
    db: &DatabaseService,
    templates: &Templates,
    caller: &CurrentUser,
    username: Option<String>,
    submitted: Submission,
) -> PageResult {
    let profile = match username {
        None => caller.user.clone(),
        Some(username) => db.get_active_user_by_username(&username).await?,
    };

    if profile.username != caller.user.username && !caller.user.is_superuser {
        log::warn!("{} tried to edit the profile of {}", caller.user.username, profile.username);
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()));
    }

    let form = match submitted {
        Submission::Form(data) => {
            let form = bind(data);
            if form.is_valid() {
                let updated = db.update_profile(profile, form.data).await?;
                log::info!("profile {} updated by {}", updated.username, caller.user.username);
                let notice = format!("Profile {} updated.", updated.username);
                return Ok(PageResponse::Redirect(with_notice(&profile_detail_path(&updated.username), &notice)));
            }
            form
        }
        Submission::Malformed => {
            let mut errors = FormErrors::default();
            errors.add("__all__", "The submitted data could not be read.");
            BoundForm::bound(ProfileForm::from_model(&profile), errors)
        }
        Submission::Empty => BoundForm::unbound(ProfileForm::from_model(&profile)),
    };

    let html = templates.render(PROFILE_EDIT, &EditContext { profile: ProfileView::from(&profile), form })?;
    Ok(PageResponse::Html(html))
}

#[get("/")]
async fn edit_own_form(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
) -> PageResult {
    profile_edit(&db, &templates, &caller, None, Submission::Empty).await
}

#[post("/")]
async fn edit_own_submit(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    body: Option<web::Form<ProfileForm>>,
) -> PageResult {
    profile_edit(&db, &templates, &caller, None, body.into()).await
}

#[get("/{username}/")]
async fn edit_user_form(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    path: web::Path<String>,
) -> PageResult {
    profile_edit(&db, &templates, &caller, Some(path.into_inner()), Submission::Empty).await
}

#[post("/{username}/")]
async fn edit_user_submit(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    path: web::Path<String>,
    body: Option<web::Form<ProfileForm>>,
) -> PageResult {
    profile_edit(&db, &templates, &caller, Some(path.into_inner()), body.into()).await
}
