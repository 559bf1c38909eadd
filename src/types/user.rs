use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

pub struct DBUserCreate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

/// Editable profile fields. `None` means the field was not submitted and stays untouched.
#[derive(Serialize, Deserialize, Validate, Debug, Default, Clone)]
pub struct ProfileForm {
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: Option<String>,
    /// An empty value clears the stored address.
    #[validate(
        custom(function = "validate_optional_email"),
        length(max = 254, message = "Ensure this value has at most 254 characters.")
    )]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub organization: Option<String>,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub position: Option<String>,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub voice: Option<String>,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub city: Option<String>,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub country: Option<String>,
    #[validate(length(max = 2000, message = "Ensure this value has at most 2000 characters."))]
    pub profile: Option<String>,
}

impl ProfileForm {
    /// Prefills the form from the stored profile, as rendered on GET.
    pub fn from_model(user: &entity::user::Model) -> Self {
        Self {
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            email: Some(user.email.clone()),
            organization: user.organization.clone(),
            position: user.position.clone(),
            voice: user.voice.clone(),
            city: user.city.clone(),
            country: user.country.clone(),
            profile: user.profile.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Validate, Debug, Default, Clone)]
pub struct ForgotUsernameForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default, Clone)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters."),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default, Clone)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[serde(default, skip_serializing)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

/// Letters, digits and @/./+/-/_ only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.".into());
        Err(err)
    }
}

/// Blank, or a well-formed address.
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("Enter a valid email address.".into());
        Err(err)
    }
}

/// Public view of a user handed to templates as `profile`.
#[derive(Serialize, Debug)]
pub struct ProfileView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub voice: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub profile: Option<String>,
    pub is_superuser: bool,
}

impl From<&entity::user::Model> for ProfileView {
    fn from(u: &entity::user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            full_name: u.full_name(),
            organization: u.organization.clone(),
            position: u.position.clone(),
            voice: u.voice.clone(),
            city: u.city.clone(),
            country: u.country.clone(),
            profile: u.profile.clone(),
            is_superuser: u.is_superuser,
        }
    }
}
