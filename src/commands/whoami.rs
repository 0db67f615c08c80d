use super::open_backend;
use crate::{api::AuthProvider, libs::messages::Message, msg_info, msg_print};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let (auth, _) = open_backend()?;
    match auth.get_current_session().await? {
        Some(session) => msg_print!(Message::CurrentIdentity {
            email: session.user.email,
            id: session.user.id.to_string(),
            expires_at: session.expires_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }),
        None => msg_info!(Message::NotSignedIn),
    }
    Ok(())
}
