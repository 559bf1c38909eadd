use actix_web::{get, post, web};
use serde::Serialize;
use std::sync::Arc;

use crate::config::config;
use crate::db::database_service::DatabaseService;
use crate::types::form::{bind, BoundForm};
use crate::types::response::{PageResponse, PageResult};
use crate::types::user::ForgotUsernameForm;
use crate::utils::mail::{send_email, Mailer};
use crate::utils::templates::{Templates, FORGOT_USERNAME};

pub const SENT_MESSAGE: &str = "Your username has been emailed to you.";
pub const NOT_FOUND_MESSAGE: &str = "No user could be found with that email address.";

#[derive(Serialize)]
struct ForgotUsernameContext {
    message: String,
    form: BoundForm<ForgotUsernameForm>,
}

fn render(templates: &Templates, message: &str, form: BoundForm<ForgotUsernameForm>) -> PageResult {
    let html = templates.render(FORGOT_USERNAME, &ForgotUsernameContext { message: message.to_string(), form })?;
    Ok(PageResponse::Html(html))
}

#[get("/forgot-username/")]
async fn forgot_username_form(templates: web::Data<Templates>) -> PageResult {
    render(&templates, "", BoundForm::unbound(ForgotUsernameForm::default()))
}

/// Mails the username of the first active account registered under the given address.
#[post("/forgot-username/")]
async fn forgot_username_submit(
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    mailer: web::Data<dyn Mailer>,
    body: web::Form<ForgotUsernameForm>,
) -> PageResult {
    let form = bind(body.into_inner());
    if !form.is_valid() {
        return render(&templates, "", form);
    }

    let users = db.list_active_users_by_email(&form.data.email).await?;
    let message = match users.first() {
        Some(user) => {
            let cfg = config();
            let subject = format!("Your username for {}", cfg.site_name);
            let body = format!("{subject} : {}", user.username);
            send_email(
                mailer.get_ref(),
                &subject,
                &body,
                &cfg.mail.default_from,
                vec![form.data.email.clone()],
                false,
            );
            SENT_MESSAGE
        }
        None => NOT_FOUND_MESSAGE,
    };

    render(&templates, message, form)
}
