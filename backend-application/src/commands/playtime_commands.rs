use chrono::Utc;
use tracing::debug;

use crate::{AppError, AppState};
use backend_domain::{
    local_today, next_playtime, parse_player_list, PlaytimeTickReport, PLAYTIME_INCREMENT_MINUTES,
};

/// Polls the online players once and credits each of them for today.
pub async fn record_playtime_tick(state: &AppState) -> Result<PlaytimeTickReport, AppError> {
    let replies = match state.console.run(&["list".to_string()]).await {
        Ok(replies) => replies,
        Err(err) => {
            state.metrics.record_playtime_errors(1);
            state
                .journal
                .error(format!("Error fetching online players: {:#}", err))
                .await;
            return Err(AppError::Internal(err));
        }
    };
    state.metrics.record_playtime_tick();

    let players = replies
        .first()
        .map(|reply| parse_player_list(&reply.body))
        .unwrap_or_default();
    let today = local_today();
    let mut report = PlaytimeTickReport {
        date: Some(today),
        players: players.clone(),
        ..PlaytimeTickReport::default()
    };

    for player in &players {
        let now = Utc::now();
        let outcome = match state.playtime_repo.find_entry(player, today).await {
            Ok(Some(entry)) => state
                .playtime_repo
                .add_minutes(entry.id, PLAYTIME_INCREMENT_MINUTES, now)
                .await
                .map(|_| false),
            Ok(None) => state
                .playtime_repo
                .insert_entry(player, today, next_playtime(None), now)
                .await
                .map(|_| true),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(true) => report.inserted += 1,
            Ok(false) => report.updated += 1,
            Err(err) => {
                report.failed.push(player.clone());
                state
                    .journal
                    .error(format!("Error updating playtime for {}: {:#}", player, err))
                    .await;
            }
        }
    }

    state.metrics.record_playtime_errors(report.failed.len());
    if players.is_empty() {
        debug!(%today, "no players online");
        return Ok(report);
    }
    state
        .journal
        .info(format!(
            "Playtime updated for {} player(s) on {}",
            report.inserted + report.updated,
            today
        ))
        .await;
    Ok(report)
}
