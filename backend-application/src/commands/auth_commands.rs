use tracing::{info, warn};

use crate::{AppError, AppState};
use backend_domain::{Claims, LoginRequest, LoginResponse};

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<LoginResponse, AppError> {
    let (Some(username), Some(password)) = (
        state.config.admin_username.as_deref(),
        state.config.admin_password.as_deref(),
    ) else {
        warn!("login rejected: admin credentials are not configured");
        return Err(AppError::Unauthorized);
    };

    if !credentials_match(username, password, &payload) {
        warn!(username = %payload.username, "login rejected: wrong credentials");
        return Err(AppError::Unauthorized);
    }

    let token = state
        .token_service
        .issue(&payload.username)
        .map_err(|err| AppError::Internal(err.context("failed to generate token")))?;
    info!(username = %payload.username, "admin login");
    Ok(LoginResponse {
        token,
        message: "Login successful".to_string(),
    })
}

pub fn verify_admin_token(state: &AppState, token: &str) -> Result<Claims, AppError> {
    state.token_service.verify(token).map_err(|err| {
        warn!("token rejected: {:#}", err);
        AppError::Unauthorized
    })
}

fn credentials_match(username: &str, password: &str, payload: &LoginRequest) -> bool {
    payload.username == username && payload.password == password
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    #[tokio::test]
    async fn login_issues_token_for_admin() {
        let harness = TestHarness::new();
        let response = login(
            &harness.state,
            LoginRequest {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
            },
        )
        .await
        .expect("login");
        assert_eq!(response.message, "Login successful");
        let claims = verify_admin_token(&harness.state, &response.token).expect("verify");
        assert_eq!(claims.username, "admin");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let harness = TestHarness::new();
        let err = login(
            &harness.state,
            LoginRequest {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .expect_err("reject");
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn login_rejects_when_admin_not_configured() {
        let mut harness = TestHarness::new();
        harness.state.config.admin_password = None;
        let err = login(
            &harness.state,
            LoginRequest {
                username: "admin".to_string(),
                password: String::new(),
            },
        )
        .await
        .expect_err("reject");
        assert!(matches!(err, AppError::Unauthorized));
    }
}
