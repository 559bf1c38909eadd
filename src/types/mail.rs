use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
pub struct SendEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: Option<String>,
}

