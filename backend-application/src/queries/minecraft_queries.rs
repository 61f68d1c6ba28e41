use crate::{AppError, AppState};
use backend_domain::{parse_player_counts, parse_player_list, ServerStatus};

/// Runs `list` and `version` in one session. The latency is the round
/// trip of `list`.
pub async fn server_status(state: &AppState) -> Result<ServerStatus, AppError> {
    let replies = state
        .console
        .run(&["list".to_string(), "version".to_string()])
        .await?;
    let list = replies.first();
    let counts = list
        .and_then(|reply| parse_player_counts(&reply.body))
        .unwrap_or_default();
    let version = replies
        .get(1)
        .map(|reply| reply.body.trim().to_string())
        .filter(|text| !text.is_empty());

    Ok(ServerStatus {
        online: true,
        latency: list.map(|reply| reply.elapsed_ms).unwrap_or_default(),
        players_online: counts.online,
        max_players: counts.max,
        version,
    })
}

pub async fn online_players(state: &AppState) -> Result<Vec<String>, AppError> {
    let replies = state.console.run(&["list".to_string()]).await?;
    Ok(replies
        .first()
        .map(|reply| parse_player_list(&reply.body))
        .unwrap_or_default())
}
