use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};

#[derive(Serialize, Deserialize)]
pub struct Response {}

#[get("")]
async fn health(
    db: web::Data<Arc<DatabaseService>>,
) -> ApiResult<Response> {
    db.connection().ping().await.map_err(AppError::Db)?;
    Ok(ApiResponse::EmptyOk)
}
