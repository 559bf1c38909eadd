use actix_web::{get, web};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::config;
use crate::db::database_service::DatabaseService;
use crate::types::response::{PageResponse, PageResult};
use crate::types::user::ProfileView;
use crate::utils::templates::{Templates, PROFILE_DETAIL};
use crate::utils::webutils::Caller;

#[derive(Deserialize)]
pub struct DetailQuery {
    pub notice: Option<String>,
}

#[derive(Serialize)]
struct DetailContext {
    access_token: Option<String>,
    profile: ProfileView,
    notice: Option<String>,
}

#[get("/profile/{username}/")]
async fn profile_detail(
    caller: Caller,
    db: web::Data<Arc<DatabaseService>>,
    templates: web::Data<Templates>,
    path: web::Path<String>,
    query: web::Query<DetailQuery>,
) -> PageResult {
    let profile = db.get_active_user_by_username(&path).await?;

    let access_token = match caller.user() {
        Some(user) => {
            let ttl = Duration::seconds(config().access_token_expire_seconds);
            db.get_or_create_token(user, ttl)
                .await
                .filter(|t| !t.is_expired())
                .map(|t| t.token)
        }
        None => None,
    };

    let html = templates.render(
        PROFILE_DETAIL,
        &DetailContext {
            access_token,
            profile: ProfileView::from(&profile),
            notice: query.into_inner().notice,
        },
    )?;
    Ok(PageResponse::Html(html))
}
