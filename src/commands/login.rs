use super::{open_backend, signup};
use crate::{
    api::AuthProvider,
    libs::{error::TaskError, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};

pub async fn cmd() -> Result<()> {
    let (auth, _) = open_backend()?;
    sign_in(&auth).await?;
    Ok(())
}

/// Asks for credentials and signs in. Returns whether a session was
/// obtained; a rejected attempt is reported, not returned as an error.
pub async fn sign_in<A: AuthProvider>(auth: &A) -> Result<bool> {
    let email: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptEmail.to_string())
        .interact_text()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    match auth.sign_in(email.trim(), &password).await {
        Ok(session) => {
            msg_success!(Message::SignedIn(session.user.email));
            Ok(true)
        }
        Err(TaskError::Auth(message)) | Err(TaskError::Validation(message)) => {
            msg_error!(message);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Login view: offers sign-in or sign-up until one succeeds or the user
/// gives up.
pub async fn prompt<A: AuthProvider>(auth: &A) -> Result<bool> {
    loop {
        let has_account = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptHaveAccount.to_string())
            .default(true)
            .interact()?;

        let signed_in = if has_account {
            sign_in(auth).await?
        } else {
            signup::register(auth).await?
        };
        if signed_in {
            return Ok(true);
        }

        let retry = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTryAgain.to_string())
            .default(true)
            .interact()?;
        if !retry {
            return Ok(false);
        }
    }
}
