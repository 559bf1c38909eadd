pub mod mail;
pub mod templates;
pub mod token;
pub mod webutils;
