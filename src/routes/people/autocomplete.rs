use actix_web::{get, web};
use std::sync::Arc;

use crate::db::database_service::DatabaseService;
use crate::types::autocomplete::{AutocompleteQuery, AutocompleteResponse, AutocompleteResult, Pagination};
use crate::types::response::{ApiResponse, ApiResult};
use crate::utils::webutils::Caller;

#[get("/autocomplete/")]
async fn autocomplete(
    caller: Caller,
    db: web::Data<Arc<DatabaseService>>,
    query: web::Query<AutocompleteQuery>,
) -> ApiResult<AutocompleteResponse> {
    let (users, more) = db
        .autocomplete_users(caller.user(), query.term(), query.page_index())
        .await?;

    let results = users
        .into_iter()
        .map(|u| AutocompleteResult {
            id: u.id.to_string(),
            text: u.username.clone(),
            selected_text: u.username,
        })
        .collect();

    Ok(ApiResponse::Ok(AutocompleteResponse {
        results,
        pagination: Pagination { more },
    }))
}
