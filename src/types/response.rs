use serde::Serialize;
use crate::types::error::AppError;
use actix_web::{http::header, HttpResponse, Responder};

pub enum ApiResponse<T> {
    Ok(T),
    EmptyOk,
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = actix_web::body::BoxBody;
    fn respond_to(self, _: &actix_web::HttpRequest) -> HttpResponse {
        match self {
            ApiResponse::Ok(v) => HttpResponse::Ok().json(v),
            ApiResponse::EmptyOk => HttpResponse::Ok().finish(),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Rendered pages and the redirects between them.
pub enum PageResponse {
    Html(String),
    CreatedHtml(String),
    Redirect(String),
}

impl Responder for PageResponse {
    type Body = actix_web::body::BoxBody;
    fn respond_to(self, _: &actix_web::HttpRequest) -> HttpResponse {
        match self {
            PageResponse::Html(body) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(body),
            PageResponse::CreatedHtml(body) => HttpResponse::Created()
                .content_type("text/html; charset=utf-8")
                .body(body),
            PageResponse::Redirect(location) => HttpResponse::Found()
                .insert_header((header::LOCATION, location))
                .finish(),
        }
    }
}

pub type PageResult = Result<PageResponse, AppError>;
