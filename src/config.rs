use serde_json::{json, Map, Value};
use std::env;
use std::sync::OnceLock;

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub port: u16,
    pub db_url: String,
    pub site_name: String,
    pub access_token_expire_seconds: i64,
    pub mail: MailConfig,
    pub account: AccountConfig,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_key: String,
    pub endpoint: String,
    pub default_from: String,
}

/// Settings consumed by the signup and logout pages.
#[derive(Clone, Debug)]
pub struct AccountConfig {
    pub local_signup: bool,
    pub custom_logout_data: Map<String, Value>,
}

pub const DEFAULT_MAIL_ENDPOINT: &str = "https://api.resend.com/emails";

pub fn default_logout_data() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("message".into(), json!("You have successfully logged out!"));
    data
}

impl EnvConfig {
    fn get_env(key: &str) -> String {
        env::var(key).unwrap_or_else(|_| panic!("Environment variable {} not set", key))
    }

    fn get_env_or(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn parse_bool(raw: &str) -> Option<bool> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    /// CUSTOM_LOGOUT_DATA must be a JSON object; anything else falls back to the default message.
    fn parse_logout_data(raw: Option<String>) -> Map<String, Value> {
        match raw.map(|r| serde_json::from_str::<Value>(&r)) {
            Some(Ok(Value::Object(map))) => map,
            Some(_) => {
                log::warn!("CUSTOM_LOGOUT_DATA is not a JSON object, using default");
                default_logout_data()
            }
            None => default_logout_data(),
        }
    }

    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let db_url: String = Self::get_env("DATABASE_URL");
        let resend_key: String = Self::get_env("RESEND_KEY");

        EnvConfig {
            port: Self::get_env_or("PORT", "8080").parse().unwrap_or(8080),
            db_url,
            site_name: Self::get_env_or("SITE_NAME", "People Portal"),
            access_token_expire_seconds: Self::get_env_or("ACCESS_TOKEN_EXPIRE_SECONDS", "86400")
                .parse()
                .unwrap_or(86400),
            mail: MailConfig {
                api_key: resend_key,
                endpoint: Self::get_env_or("MAIL_ENDPOINT", DEFAULT_MAIL_ENDPOINT),
                default_from: Self::get_env_or("DEFAULT_FROM_EMAIL", "noreply@example.com"),
            },
            account: AccountConfig {
                local_signup: env::var("SOCIALACCOUNT_WITH_GEONODE_LOCAL_SINGUP")
                    .ok()
                    .and_then(|v| Self::parse_bool(&v))
                    .unwrap_or(true),
                custom_logout_data: Self::parse_logout_data(env::var("CUSTOM_LOGOUT_DATA").ok()),
            },
        }
    }
}

pub static CONFIG: OnceLock<EnvConfig> = OnceLock::new();

pub fn config() -> &'static EnvConfig {
    CONFIG.get().expect("Not initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logout_data_accepts_objects_only() {
        let parsed = EnvConfig::parse_logout_data(Some(r#"{"message":"bye","title":"Logout"}"#.into()));
        assert_eq!(parsed.get("title"), Some(&json!("Logout")));

        let fallback = EnvConfig::parse_logout_data(Some("[1,2]".into()));
        assert_eq!(fallback, default_logout_data());
        assert_eq!(EnvConfig::parse_logout_data(None), default_logout_data());
    }

    #[test]
    fn bool_settings() {
        assert_eq!(EnvConfig::parse_bool("True"), Some(true));
        assert_eq!(EnvConfig::parse_bool("0"), Some(false));
        assert_eq!(EnvConfig::parse_bool("maybe"), None);
    }
}
