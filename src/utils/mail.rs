use crate::config::MailConfig;
use crate::types::mail::SendEmail;
use reqwest::{Client, ClientBuilder};
use std::time::{Duration, Instant};

/// Hands outgoing mail to something that delivers it later. Callers never wait for delivery.
pub trait Mailer: Send + Sync {
    fn dispatch(&self, email: SendEmail, fail_silently: bool);
}

/// Delivers through the Resend HTTP API on a detached task.
pub struct ResendMailer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(cfg: &MailConfig) -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .user_agent("people-portal/1.0 (+reqwest)")
            .tcp_nodelay(true)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

impl Mailer for ResendMailer {
    fn dispatch(&self, email: SendEmail, fail_silently: bool) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();

        actix_web::rt::spawn(async move {
            match deliver(&client, &endpoint, &api_key, &email).await {
                Ok(_) => log::info!("[mail] delivered \"{}\" to {} recipient(s)", email.subject, email.to.len()),
                Err(e) if fail_silently => log::debug!("[mail] delivery failed: {e}"),
                Err(e) => log::error!("[mail] delivery failed: {e}"),
            }
        });
    }
}

async fn deliver(client: &Client, api: &str, api_key: &str, email: &SendEmail) -> Result<String, String> {
    let payload = serde_json::to_string(email)
        .map_err(|e| format!("serialize email failed: {e}"))?;

    log::debug!("[mail] -> POST {api} ({} bytes)", payload.len());

    let req = client
        .post(api)
        .bearer_auth(api_key) // do NOT log the key
        .header("Content-Type", "application/json")
        .body(payload)
        .build()
        .map_err(|e| format!("build request failed: {e}"))?;

    let t0 = Instant::now();
    let res = client.execute(req).await.map_err(|e| format!("send failed: {e}"))?;
    let dt = t0.elapsed();

    let status = res.status();
    let body = res.text().await.map_err(|e| format!("read body failed: {e}"))?;

    log::debug!("[mail] <- status: {status} in {} ms", dt.as_millis());

    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("Resend API error: HTTP {status}: {body}"))
    }
}

/// Queues a plain-text message for `to`.
pub fn send_email(
    mailer: &dyn Mailer,
    subject: &str,
    body: &str,
    from: &str,
    to: Vec<String>,
    fail_silently: bool,
) {
    mailer.dispatch(
        SendEmail {
            from: from.to_string(),
            to,
            subject: subject.to_string(),
            text: Some(body.to_string()),
        },
        fail_silently,
    );
}
