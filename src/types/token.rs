use chrono::{DateTime, Utc};
use serde::Serialize;

/// A token handed back to the browser after signup or login.
#[derive(Serialize, Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires: DateTime<Utc>,
}

impl From<entity::access_token::Model> for IssuedToken {
    fn from(t: entity::access_token::Model) -> Self {
        Self { token: t.token, expires: t.expires }
    }
}
