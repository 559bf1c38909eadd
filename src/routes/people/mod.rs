pub mod autocomplete;
pub mod detail;
pub mod edit;
pub mod forgot_username;
pub mod permissions;
