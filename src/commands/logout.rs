use super::open_backend;
use crate::{api::AuthProvider, libs::messages::Message, msg_success};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let (auth, _) = open_backend()?;
    auth.sign_out().await?;
    msg_success!(Message::SignedOut);
    Ok(())
}
