use tracing::info;

use crate::{AppError, AppState};

/// Broadcasts `message` to every player with `say`.
pub async fn send_message(state: &AppState, message: Option<String>) -> Result<(), AppError> {
    let message = message
        .map(|message| message.replace(['\r', '\n'], " ").trim().to_string())
        .unwrap_or_default();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }
    state.console.run(&[format!("say {}", message)]).await?;
    info!(length = message.len(), "broadcast sent to game server");
    Ok(())
}
