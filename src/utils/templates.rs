use handlebars::Handlebars;
use serde::Serialize;

use crate::types::error::AppError;

pub const PROFILE_EDIT: &str = "people/profile_edit";
pub const PROFILE_DETAIL: &str = "people/profile_detail";
pub const FORGOT_USERNAME: &str = "people/forgot_username_form";
pub const SIGNUP: &str = "account/signup";
pub const SIGNUP_DONE: &str = "account/signup_done";
pub const LOGIN: &str = "account/login";
pub const LOGOUT: &str = "account/logout";
pub const USER_AND_GROUP_PERMISSIONS: &str = "base/user_and_group_permissions";

const SOURCES: &[(&str, &str)] = &[
    ("base", include_str!("../../templates/base.hbs")),
    (PROFILE_EDIT, include_str!("../../templates/people/profile_edit.hbs")),
    (PROFILE_DETAIL, include_str!("../../templates/people/profile_detail.hbs")),
    (FORGOT_USERNAME, include_str!("../../templates/people/forgot_username_form.hbs")),
    (SIGNUP, include_str!("../../templates/account/signup.hbs")),
    (SIGNUP_DONE, include_str!("../../templates/account/signup_done.hbs")),
    (LOGIN, include_str!("../../templates/account/login.hbs")),
    (LOGOUT, include_str!("../../templates/account/logout.hbs")),
    (USER_AND_GROUP_PERMISSIONS, include_str!("../../templates/base/user_and_group_permissions.hbs")),
];

/// Compiled page templates, shared read-only across workers.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in SOURCES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, ctx: &T) -> Result<String, AppError> {
        Ok(self.registry.render(name, ctx)?)
    }
}
