use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::blog_commands;
use backend_application::queries::blog_queries;
use backend_application::AppState;
use backend_domain::{BlogPayload, BlogPost};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, HttpError> {
    let posts = blog_queries::list_posts(&state).await?;
    Ok(Json(posts))
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogPost>, HttpError> {
    let post = blog_queries::get_post(&state, id).await?;
    Ok(Json(post))
}

pub async fn create_blog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BlogPayload>,
) -> Result<(StatusCode, Json<BlogPost>), HttpError> {
    authorize(&state, &headers)?;
    let post = blog_commands::create_post(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_blog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<BlogPayload>,
) -> Result<StatusCode, HttpError> {
    authorize(&state, &headers)?;
    blog_commands::update_post(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_blog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    authorize(&state, &headers)?;
    blog_commands::delete_post(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
