pub mod access_token;
pub mod database_service;
pub mod groups;
pub mod permissions;
pub mod user;
