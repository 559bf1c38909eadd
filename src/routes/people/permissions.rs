use actix_web::{get, post, web};
use serde::Serialize;
use std::sync::Arc;

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::form::{BoundForm, FormErrors};
use crate::types::permission::{
    split_list, PermissionChange, PermissionForm, PermissionMode, PermissionScope, PermissionType,
};
use crate::types::response::{PageResponse, PageResult};
use crate::utils::templates::{Templates, USER_AND_GROUP_PERMISSIONS};
use crate::utils::webutils::{profile_detail_path, with_notice, CurrentUser};

#[derive(Serialize)]
struct PermissionContext {
    model: PermissionScope,
    targets: Vec<String>,
    form: BoundForm<PermissionForm>,
}

fn validate(form: &PermissionForm) -> Result<PermissionChange, FormErrors> {
    let mut errors = FormErrors::default();

    let resources = split_list(&form.resources);
    if resources.is_empty() {
        errors.add("resources", "This field is required.");
    }
    let permission = PermissionType::parse(&form.permission_type);
    if permission.is_none() {
        errors.add("permission_type", "Select a valid choice.");
    }
    let mode = PermissionMode::parse(&form.mode);
    if mode.is_none() {
        errors.add("mode", "Select a valid choice.");
    }

    match (permission, mode) {
        (Some(permission), Some(mode)) if errors.is_empty() => Ok(PermissionChange {
            targets: split_list(&form.ids),
            resources,
            permission,
            mode,
        }),
        _ => Err(errors),
    }
}

/// Maps the selected ids to user ids; unknown ids are a form error.
async fn resolve_targets(
    db: &DatabaseService,
    scope: PermissionScope,
    targets: &[String],
) -> Result<Result<Vec<uuid::Uuid>, FormErrors>, AppError> {
    let (found, user_ids): (Vec<String>, Vec<uuid::Uuid>) = match scope {
        PermissionScope::Profile => {
            let users = db.get_users_by_usernames(targets).await?;
            let ids = users.iter().map(|u| u.id).collect();
            (users.into_iter().map(|u| u.username).collect(), ids)
        }
        PermissionScope::Group => {
            let groups = db.get_groups_by_slugs(targets).await?;
            let group_ids: Vec<_> = groups.iter().map(|g| g.id).collect();
            let ids = db.list_group_member_ids(&group_ids).await?;
            (groups.into_iter().map(|g| g.slug).collect(), ids)
        }
    };

    let missing: Vec<&str> = targets
        .iter()
        .filter(|t| !found.contains(t))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        let mut errors = FormErrors::default();
        errors.add("ids", format!("Unknown {scope}: {}", missing.join(", ")));
        return Ok(Err(errors));
    }
    Ok(Ok(user_ids))
}

/// Bulk permission assignment shared by the user and group pages.
///
/// Only superusers get past the first check. Without any selected ids, or on
/// cancel, the caller is sent back to their profile.
pub async fn user_and_group_permission(
    db: &DatabaseService,
    templates: &Templates,
    caller: &CurrentUser,
    scope: PermissionScope,
    form: PermissionForm,
    submitted: bool,
) -> PageResult {
    if !caller.user.is_superuser {
        return Err(AppError::Forbidden("You are not allowed to change permissions".to_string()));
    }

    let back = profile_detail_path(&caller.user.username);
    let targets = split_list(&form.ids);
    if targets.is_empty() || (submitted && form.cancel.is_some()) {
        return Ok(PageResponse::Redirect(back));
    }

    let errors = if submitted {
        match validate(&form) {
            Ok(change) => match resolve_targets(db, scope, &change.targets).await? {
                Ok(user_ids) => {
                    let touched = db
                        .apply_permission_change(&user_ids, &change.resources, change.permission, change.mode)
                        .await?;
                    log::info!(
                        "{} applied {:?} {} on {} resource(s) for {} user(s), {touched} row(s) changed",
                        caller.user.username,
                        change.mode,
                        change.permission.as_str(),
                        change.resources.len(),
                        user_ids.len(),
                    );
                    let notice = format!("Permissions updated for {} user(s).", user_ids.len());
                    return Ok(PageResponse::Redirect(with_notice(&back, &notice)));
                }
                Err(errors) => errors,
            },
            Err(errors) => errors,
        }
    } else {
        FormErrors::default()
    };

    let form = if submitted { BoundForm::bound(form, errors) } else { BoundForm::unbound(form) };
    let html = templates.render(USER_AND_GROUP_PERMISSIONS, &PermissionContext { model: scope, targets, form })?;
    Ok(PageResponse::Html(html))
}

#[get("/")]
async fn user_permission_form(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    query: web::Query<PermissionForm>,
) -> PageResult {
    user_and_group_permission(&db, &templates, &caller, PermissionScope::Profile, query.into_inner(), false).await
}

#[post("/")]
async fn user_permission_submit(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    body: web::Form<PermissionForm>,
) -> PageResult {
    user_and_group_permission(&db, &templates, &caller, PermissionScope::Profile, body.into_inner(), true).await
}

#[get("/")]
async fn group_permission_form(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    query: web::Query<PermissionForm>,
) -> PageResult {
    user_and_group_permission(&db, &templates, &caller, PermissionScope::Group, query.into_inner(), false).await
}

#[post("/")]
async fn group_permission_submit(
    caller: web::ReqData<CurrentUser>,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    body: web::Form<PermissionForm>,
) -> PageResult {
    user_and_group_permission(&db, &templates, &caller, PermissionScope::Group, body.into_inner(), true).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_collects_every_error() {
        let errors = validate(&PermissionForm { ids: "ann".into(), ..Default::default() }).unwrap_err();
        assert!(errors.get("resources").is_some());
        assert!(errors.get("permission_type").is_some());
        assert!(errors.get("mode").is_some());
    }

    #[test]
    fn validate_accepts_complete_form() {
        let change = validate(&PermissionForm {
            ids: "ann, bob".into(),
            resources: "roads,rivers".into(),
            permission_type: "download".into(),
            mode: "set".into(),
            cancel: None,
        })
        .unwrap();
        assert_eq!(change.targets, vec!["ann", "bob"]);
        assert_eq!(change.permission, PermissionType::Download);
        assert_eq!(change.mode, PermissionMode::Set);
    }
}
