use crate::utils::webutils::validate_token;
use actix_web::web;

pub mod account;
pub mod health;
pub mod people;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let user_auth = actix_web_httpauth::middleware::HttpAuthentication::bearer(validate_token);

    cfg.service(
        web::scope("/health").service(health::health)
    );
    cfg.service(
        web::scope("/people")
            .service(
                web::scope("/edit")
                    .service(people::edit::edit_own_form)
                    .service(people::edit::edit_own_submit)
                    .service(people::edit::edit_user_form)
                    .service(people::edit::edit_user_submit)
                    .wrap(user_auth.clone())
            )
            .service(
                web::scope("/permissions")
                    .service(people::permissions::user_permission_form)
                    .service(people::permissions::user_permission_submit)
                    .wrap(user_auth.clone())
            )
            .service(people::detail::profile_detail)
            .service(people::autocomplete::autocomplete)
    );
    cfg.service(
        web::scope("/groups")
            .service(
                web::scope("/permissions")
                    .service(people::permissions::group_permission_form)
                    .service(people::permissions::group_permission_submit)
                    .wrap(user_auth)
            )
    );
    cfg.service(
        web::scope("/account")
            .service(account::signup::signup_form)
            .service(account::signup::signup_submit)
            .service(account::login::login_form)
            .service(account::login::login_submit)
            .service(account::logout::logout)
            .service(people::forgot_username::forgot_username_form)
            .service(people::forgot_username::forgot_username_submit)
    );
}
