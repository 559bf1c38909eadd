#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{web, App};
use chrono::Duration;
use entity::group::GroupAccess;
use entity::group_member::MemberRole;
use entity::user::Model as UserModel;
use people_portal::config::{default_logout_data, AccountConfig, EnvConfig, MailConfig, CONFIG};
use people_portal::db::database_service::DatabaseService;
use people_portal::types::mail::SendEmail;
use people_portal::types::user::DBUserCreate;
use people_portal::utils::mail::Mailer;
use people_portal::utils::templates::Templates;
use people_portal::utils::token::hash_password;
use serde_json::json;
use uuid::Uuid;

pub const PASSWORD: &str = "s3cret-passw0rd";

/// Keeps every dispatched email so tests can count and inspect them.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SendEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SendEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn dispatch(&self, email: SendEmail, _fail_silently: bool) {
        self.sent.lock().unwrap().push(email);
    }
}

pub fn get_test_config() -> EnvConfig {
    let mut logout = default_logout_data();
    logout.insert("title".into(), json!("See you soon"));

    EnvConfig {
        port: 8080,
        db_url: "sqlite::memory:".to_string(),
        site_name: "Test Portal".to_string(),
        access_token_expire_seconds: 3600,
        mail: MailConfig {
            api_key: "test".to_string(),
            endpoint: "http://localhost/never".to_string(),
            default_from: "portal@example.com".to_string(),
        },
        account: AccountConfig {
            local_signup: true,
            custom_logout_data: logout,
        },
    }
}

pub struct TestContext {
    pub db: Arc<DatabaseService>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestContext {
    pub async fn new() -> TestContext {
        CONFIG.get_or_init(get_test_config);

        let db = Arc::new(
            DatabaseService::new("sqlite::memory:")
                .await
                .expect("Failed to initialize DatabaseService"),
        );

        TestContext { db, mailer: Arc::new(RecordingMailer::default()) }
    }

    pub fn create_app(&self) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mailer: Arc<dyn Mailer> = self.mailer.clone();
        App::new()
            .app_data(web::Data::new(Arc::clone(&self.db)))
            .app_data(web::Data::new(Templates::new().expect("templates compile")))
            .app_data(web::Data::from(mailer))
            .configure(people_portal::routes::configure_routes)
    }

    /// Creates an active account and a live token for it.
    pub async fn create_user(&self, username: &str, email: &str, superuser: bool) -> (UserModel, String) {
        let user = self
            .db
            .create_user(DBUserCreate {
                username: username.to_string(),
                email: email.to_string(),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
                is_superuser: superuser,
            })
            .await
            .expect("Failed to create user");

        let token = self
            .db
            .create_access_token(user.id, Duration::hours(1))
            .await
            .expect("Failed to create token");

        (user, token.token)
    }

    pub async fn create_named_user(&self, username: &str, first: &str, last: &str, email: &str) -> UserModel {
        self.db
            .create_user(DBUserCreate {
                username: username.to_string(),
                email: email.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
                is_superuser: false,
            })
            .await
            .expect("Failed to create user")
    }

    pub async fn create_group_with(&self, slug: &str, access: GroupAccess, members: &[Uuid]) -> Uuid {
        let group = self
            .db
            .create_group(slug, slug, access)
            .await
            .expect("Failed to create group");
        for member in members {
            self.db
                .add_group_member(group.id, *member, MemberRole::Member)
                .await
                .expect("Failed to add member");
        }
        group.id
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
