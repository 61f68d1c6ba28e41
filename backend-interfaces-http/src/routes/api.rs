use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    auth_handlers, blog_handlers, ip_handlers, log_handlers, minecraft_handlers, ops_handlers,
    proxmox_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/auth/check", get(auth_handlers::check_auth))
        .route(
            "/api/blogs",
            get(blog_handlers::list_blogs).post(blog_handlers::create_blog),
        )
        .route(
            "/api/blogs/:id",
            get(blog_handlers::get_blog)
                .put(blog_handlers::update_blog)
                .delete(blog_handlers::delete_blog),
        )
        .route(
            "/api/minecraft/status",
            get(minecraft_handlers::server_status),
        )
        .route(
            "/api/minecraft/playerlist",
            get(minecraft_handlers::player_list),
        )
        .route(
            "/api/minecraft/sendmessage",
            get(minecraft_handlers::send_message).post(minecraft_handlers::send_message_form),
        )
        .route(
            "/api/minecraft/getplaytime",
            get(minecraft_handlers::get_playtime),
        )
        .route(
            "/api/minecraft/playtime/check",
            post(minecraft_handlers::check_playtime),
        )
        .route(
            "/api/proxmox/vmstatus",
            get(proxmox_handlers::vm_status_list),
        )
        .route(
            "/api/proxmox/getvmstatus",
            get(proxmox_handlers::vm_status),
        )
        .route(
            "/api/proxmox/getvmdetailedstatus",
            get(proxmox_handlers::vm_detailed_status),
        )
        .route(
            "/api/ip/currentpublicip",
            get(ip_handlers::current_public_ip),
        )
        .route("/api/ip/history", get(ip_handlers::ip_history))
        .route("/api/ip/reconcile", post(ip_handlers::reconcile_now))
        .route("/api/logs", get(log_handlers::list_logs))
        .route(
            "/api/ops/rcon-config",
            get(ops_handlers::get_rcon_config).put(ops_handlers::update_rcon_config),
        )
        .route("/api/ops/health/live", get(ops_handlers::health_live))
        .route("/api/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/api/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use backend_application::testing::TestHarness;

    use super::*;

    const ADMIN_TOKEN: &str = "Bearer token-for:admin";

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    async fn send(harness: &TestHarness, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(harness.state.clone())
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    #[tokio::test]
    async fn login_returns_token_and_rejects_bad_password() {
        let harness = TestHarness::new();
        let (status, body) = send(
            &harness,
            request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"username": "admin", "password": "hunter2"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], "token-for:admin");

        let (status, body) = send(
            &harness,
            request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"username": "admin", "password": "nope"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn protected_routes_require_a_valid_token() {
        let harness = TestHarness::new();
        let payload = json!({"title": "t", "content": "c", "author": "a"});

        let (status, body) = send(
            &harness,
            request(Method::POST, "/api/blogs", None, Some(payload.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing bearer token");

        let (status, _) = send(
            &harness,
            request(Method::POST, "/api/blogs", Some("Bearer forged"), Some(payload)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&harness, request(Method::GET, "/api/auth/check", Some(ADMIN_TOKEN), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn blog_lifecycle_over_http() {
        let harness = TestHarness::new();
        let (status, created) = send(
            &harness,
            request(
                Method::POST,
                "/api/blogs",
                Some(ADMIN_TOKEN),
                Some(json!({"title": "Hello", "content": "body", "author": "Ada"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().expect("id");

        let (status, post) = send(&harness, request(Method::GET, &format!("/api/blogs/{}", id), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post["title"], "Hello");

        let (status, _) = send(
            &harness,
            request(Method::DELETE, &format!("/api/blogs/{}", id), Some(ADMIN_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&harness, request(Method::GET, &format!("/api/blogs/{}", id), None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "blog not found");
    }

    #[tokio::test]
    async fn blank_blog_title_is_bad_request() {
        let harness = TestHarness::new();
        let (status, _) = send(
            &harness,
            request(
                Method::POST,
                "/api/blogs",
                Some(ADMIN_TOKEN),
                Some(json!({"title": "  ", "author": "Ada"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn minecraft_status_and_players() {
        let harness = TestHarness::new();
        harness
            .console
            .reply("list", "There are 2 of a max of 20 players online: alice, bob");
        harness.console.reply("version", "Paper 1.20.4");

        let (status, body) = send(&harness, request(Method::GET, "/api/minecraft/status", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["online"], true);
        assert_eq!(body["players_online"], 2);
        assert_eq!(body["max_players"], 20);

        let (_, body) = send(&harness, request(Method::GET, "/api/minecraft/playerlist", None, None)).await;
        assert_eq!(body["players"], json!(["alice", "bob"]));
    }

    #[tokio::test]
    async fn send_message_needs_text() {
        let harness = TestHarness::new();
        let (status, _) = send(
            &harness,
            request(Method::GET, "/api/minecraft/sendmessage", Some(ADMIN_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &harness,
            request(
                Method::GET,
                "/api/minecraft/sendmessage?message=hello%20world",
                Some(ADMIN_TOKEN),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(harness.console.commands(), vec!["say hello world".to_string()]);
    }

    #[tokio::test]
    async fn send_message_accepts_form_body() {
        let harness = TestHarness::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/minecraft/sendmessage")
            .header(header::AUTHORIZATION, ADMIN_TOKEN)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=server+restart+soon"))
            .expect("request");

        let (status, _) = send(&harness, request).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(
            harness.console.commands(),
            vec!["say server restart soon".to_string()]
        );
    }

    #[tokio::test]
    async fn proxmox_login_failure_is_401() {
        let harness = TestHarness::new();
        harness.hypervisor.fail_login();
        let (status, body) = send(&harness, request(Method::GET, "/api/proxmox/vmstatus", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn unknown_vm_reports_not_found_text() {
        let harness = TestHarness::new();
        let (status, body) = send(
            &harness,
            request(Method::GET, "/api/proxmox/getvmstatus?vmid=404", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "VM not found");

        let (_, body) = send(
            &harness,
            request(Method::GET, "/api/proxmox/getvmdetailedstatus?vmid=404", None, None),
        )
        .await;
        assert_eq!(body["status"], "");
    }

    #[tokio::test]
    async fn reconcile_endpoint_returns_report() {
        let harness = TestHarness::new();
        harness.ip_source.set_ip("203.0.113.7");
        let (status, body) = send(
            &harness,
            request(Method::POST, "/api/ip/reconcile", Some(ADMIN_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["public_ip"], "203.0.113.7");
        assert_eq!(body["audit_recorded"], true);
        assert_eq!(harness.store.ip_records().len(), 1);
    }

    #[tokio::test]
    async fn readiness_follows_database() {
        let harness = TestHarness::new();
        let (status, _) = send(&harness, request(Method::GET, "/api/ops/health/ready", None, None)).await;
        assert_eq!(status, StatusCode::OK);

        harness.store.set_unavailable(true);
        let (status, _) = send(&harness, request(Method::GET, "/api/ops/health/ready", None, None)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn metrics_are_admin_only() {
        let harness = TestHarness::new();
        let (status, _) = send(
            &harness,
            request(Method::GET, "/api/ops/metrics/prometheus", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &harness,
            request(Method::GET, "/api/ops/metrics/prometheus", Some(ADMIN_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_str().expect("text").contains("site_reconcile_runs_total 0"));
    }

    #[tokio::test]
    async fn rcon_config_round_trip() {
        let harness = TestHarness::new();
        let (status, _) = send(
            &harness,
            request(
                Method::PUT,
                "/api/ops/rcon-config",
                Some(ADMIN_TOKEN),
                Some(json!({"host": "mc.local", "port": 25575, "password": "pw"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &harness,
            request(Method::GET, "/api/ops/rcon-config", Some(ADMIN_TOKEN), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["host"], "mc.local");
        assert_eq!(body["enabled"], true);
    }
}
