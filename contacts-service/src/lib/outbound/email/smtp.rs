use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::MailConfig;
use crate::domain::user::ports::Mailer;
use crate::user::errors::MailerError;

/// SMTP mail dispatch.
///
/// Messages carry the action links for the confirmation and reset flows.
/// Callers dispatch fire-and-forget; a mail-server outage never fails the
/// request that triggered the message.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    public_url: String,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig, public_url: &str) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from)
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::BuildFailed(e.to_string()))?;

        Ok(Self {
            transport,
            from,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailerError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::BuildFailed(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailerError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let body = format!(
            "Hi {username},\n\n\
             Follow the link to confirm your email address:\n\
             {}/api/auth/confirmed_email/{token}\n\n\
             The link is valid for 7 days. If you did not register, ignore this message.\n",
            self.public_url
        );
        self.send(to, "Confirm your email", body).await
    }

    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let body = format!(
            "Hi {username},\n\n\
             Follow the link to finish resetting your password:\n\
             {}/api/auth/confirm_reset_password/{token}\n\n\
             If you did not request a reset, ignore this message.\n",
            self.public_url
        );
        self.send(to, "Reset password", body).await
    }
}
