use crate::{AppError, AppState};
use backend_domain::BlogPost;

pub async fn list_posts(state: &AppState) -> Result<Vec<BlogPost>, AppError> {
    Ok(state.blog_repo.list_posts().await?)
}

pub async fn get_post(state: &AppState, id: i64) -> Result<BlogPost, AppError> {
    state
        .blog_repo
        .find_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("blog".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::blog_commands::create_post;
    use crate::testing::TestHarness;
    use backend_domain::BlogPayload;

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let harness = TestHarness::new();
        let err = get_post(&harness.state, 7).await.expect_err("missing");
        assert_eq!(err.to_string(), "blog not found");
    }

    #[tokio::test]
    async fn newest_post_comes_first() {
        let harness = TestHarness::new();
        for title in ["older", "newer"] {
            create_post(
                &harness.state,
                BlogPayload {
                    title: title.to_string(),
                    content: String::new(),
                    author: "Ada".to_string(),
                },
            )
            .await
            .expect("create");
        }
        let posts = list_posts(&harness.state).await.expect("list");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "newer");
    }
}
