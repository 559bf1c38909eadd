use actix_web::{get, web, HttpRequest};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::config;
use crate::db::database_service::DatabaseService;
use crate::types::response::{PageResponse, PageResult};
use crate::utils::templates::{Templates, LOGOUT};
use crate::utils::webutils::{bearer_token, Caller};

#[derive(Serialize)]
struct LogoutContext<'a> {
    custom_data: &'a Map<String, Value>,
}

/// Revokes the presented token before rendering the logout page.
/// A failed revocation is logged and the page is rendered anyway.
#[get("/logout/")]
async fn logout(
    req: HttpRequest,
    caller: Caller,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
) -> PageResult {
    if let Some(token) = bearer_token(&req) {
        match caller.user() {
            Some(user) => log::info!("Logging out {}", user.username),
            None => log::info!("Logging out an unrecognised token"),
        }
        if let Err(e) = db.revoke_access_token(&token).await {
            log::error!("An error occurred during logout: {e}");
        }
    }

    let html = templates.render(LOGOUT, &LogoutContext { custom_data: &config().account.custom_logout_data })?;
    Ok(PageResponse::Html(html))
}
