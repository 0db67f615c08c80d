use super::open_backend;
use crate::{
    api::AuthProvider,
    libs::{error::TaskError, messages::Message},
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};

pub async fn cmd() -> Result<()> {
    let (auth, _) = open_backend()?;
    register(&auth).await?;
    Ok(())
}

/// Prompts for a new account and signs it in. Returns whether a session
/// was obtained.
pub async fn register<A: AuthProvider>(auth: &A) -> Result<bool> {
    let email: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptEmail.to_string())
        .interact_text()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .with_confirmation(
            Message::PromptConfirmPassword.to_string(),
            Message::PasswordsDoNotMatch.to_string(),
        )
        .interact()?;

    match auth.sign_up(email.trim(), &password).await {
        Ok(Some(session)) => {
            msg_success!(Message::SignedUp(session.user.email));
            Ok(true)
        }
        Ok(None) => {
            msg_info!(Message::ConfirmEmailSent(email.trim().to_string()));
            Ok(false)
        }
        Err(TaskError::Auth(message)) | Err(TaskError::Validation(message)) => {
            msg_error!(message);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
