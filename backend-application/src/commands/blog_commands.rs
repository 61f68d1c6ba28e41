use chrono::Utc;
use tracing::info;

use crate::{AppError, AppState};
use backend_domain::{BlogPayload, BlogPost};

pub async fn create_post(state: &AppState, payload: BlogPayload) -> Result<BlogPost, AppError> {
    let payload = validate_payload(payload)?;
    let post = state.blog_repo.insert_post(&payload, Utc::now()).await?;
    info!(id = post.id, "blog post created");
    Ok(post)
}

pub async fn update_post(state: &AppState, id: i64, payload: BlogPayload) -> Result<(), AppError> {
    let payload = validate_payload(payload)?;
    if !state.blog_repo.update_post(id, &payload, Utc::now()).await? {
        return Err(AppError::NotFound("blog".to_string()));
    }
    info!(id, "blog post updated");
    Ok(())
}

pub async fn delete_post(state: &AppState, id: i64) -> Result<(), AppError> {
    if !state.blog_repo.delete_post(id).await? {
        return Err(AppError::NotFound("blog".to_string()));
    }
    info!(id, "blog post deleted");
    Ok(())
}

fn validate_payload(payload: BlogPayload) -> Result<BlogPayload, AppError> {
    let payload = payload.normalized();
    if payload.title.is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }
    if payload.author.is_empty() {
        return Err(AppError::BadRequest("author must not be empty".to_string()));
    }
    Ok(payload)
}
