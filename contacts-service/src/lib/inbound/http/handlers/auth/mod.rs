use std::sync::Arc;

use crate::inbound::http::router::AppState;
use crate::user::models::User;
use crate::user::ports::Mailer;

pub mod confirm_email;
pub mod confirm_reset_password;
pub mod login;
pub mod register;
pub mod request_email;
pub mod reset_password;

/// Mint a confirmation token and hand the message to the mailer in a detached
/// task. The HTTP response never waits on SMTP; failures are logged and
/// swallowed.
pub(crate) fn dispatch_confirmation(state: &AppState, user: &User) {
    let token = match state
        .auth_service
        .create_confirmation_token(user.email.as_str())
    {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, email = %user.email, "Failed to mint confirmation token");
            return;
        }
    };

    let mailer = Arc::clone(&state.mailer);
    let to = user.email.to_string();
    let username = user.username.to_string();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_confirmation(&to, &username, &token).await {
            tracing::error!(error = %e, email = %to, "Failed to send confirmation email");
        }
    });
}

/// Dispatch a password-reset message carrying an already-minted token, same
/// fire-and-forget contract as confirmation dispatch.
pub(crate) fn dispatch_password_reset(state: &AppState, user: &User, token: String) {
    let mailer = Arc::clone(&state.mailer);
    let to = user.email.to_string();
    let username = user.username.to_string();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_password_reset(&to, &username, &token).await {
            tracing::error!(error = %e, email = %to, "Failed to send password reset email");
        }
    });
}
