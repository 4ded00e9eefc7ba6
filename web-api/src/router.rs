//! Router configuration and server setup.

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::state::AppState;

/// Creates the router: open routes, the signed `/api` group and the static Mini-App fallback.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/stats", get(handlers::my_stats))
        .route("/stats/:group_id", get(handlers::group_stats))
        .route("/users", get(handlers::list_users))
        .route("/top-users", get(handlers::list_users))
        .route("/groups", get(handlers::list_groups))
        .route("/known-groups", get(handlers::known_groups));

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/public/info", get(handlers::public_info))
        .nest("/api", api);

    if let Some(dir) = state.config.static_dir.clone() {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves `router` on `addr` until the task is dropped.
pub async fn serve(addr: &str, router: Router) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{sign_init_data, TELEGRAM_DATA_HEADER};
    use crate::config::ApiConfig;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use stats_core::{Chat, ChatKind, User};
    use stats_engine::{Aggregator, ClassifiedEvent, StatsQuery};
    use std::sync::Arc;

    const TOKEN: &str = "123456:TEST-TOKEN";
    const OWNER: i64 = 7;

    fn user(id: i64) -> User {
        User {
            id,
            username: Some(format!("user{}", id)),
            first_name: format!("User{}", id),
            last_name: None,
        }
    }

    fn group(id: i64, title: &str) -> Chat {
        Chat {
            id,
            kind: ChatKind::Supergroup,
            title: Some(title.to_string()),
            username: None,
        }
    }

    fn words(count: i64) -> ClassifiedEvent {
        ClassifiedEvent {
            is_text: true,
            is_sticker: false,
            is_media: false,
            word_count: count,
            activity: "text",
        }
    }

    /// Users 42 and 43 post in group -100; the owner (7) never posts.
    async fn make_test_server() -> (TestServer, AppState) {
        let store = storage::connect("sqlite::memory:").await.unwrap();
        let aggregator = Aggregator::new(Arc::clone(&store));
        let chat = group(-100, "Rustaceans");
        for count in [4, 6] {
            aggregator.apply_event(&user(42), &chat, &words(count)).await.unwrap();
        }
        aggregator.apply_event(&user(43), &chat, &words(1)).await.unwrap();

        let config = ApiConfig::new("127.0.0.1", 0, TOKEN).with_admins(Some(OWNER), vec![8]);
        let state = AppState::new(config, StatsQuery::new(store));
        let server = TestServer::new(create_router(state.clone())).unwrap();
        (server, state)
    }

    fn signed_header(user_id: i64) -> (HeaderName, HeaderValue) {
        let user = format!(r#"{{"id":{},"first_name":"Test"}}"#, user_id);
        let raw = sign_init_data(&[("auth_date", "1700000000"), ("user", &user)], TOKEN);
        (
            HeaderName::from_static("telegram-data"),
            HeaderValue::from_str(&raw).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let (server, _) = make_test_server().await;
        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[tokio::test]
    async fn test_public_info() {
        let (server, state) = make_test_server().await;

        let body: serde_json::Value = server.get("/public/info").await.json();
        assert!(body["botUsername"].is_null());
        assert_eq!(body["timezone"], "Asia/Jakarta");

        state.set_bot_username("group_stats_bot").await;
        let body: serde_json::Value = server.get("/public/info").await.json();
        assert_eq!(body["botUsername"], "group_stats_bot");
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let (server, _) = make_test_server().await;
        let response = server.get("/api/stats").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Not a Telegram Web App request");
    }

    #[tokio::test]
    async fn test_bad_signature_is_403() {
        let (server, _) = make_test_server().await;
        let (_, value) = signed_header(42);
        let tampered = value.to_str().unwrap().replace("%3A42", "%3A7");
        let response = server
            .get("/api/stats")
            .add_header(
                HeaderName::from_static("telegram-data"),
                HeaderValue::from_str(&tampered).unwrap(),
            )
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid hash");
    }

    #[tokio::test]
    async fn test_payload_without_user_is_401() {
        let (server, _) = make_test_server().await;
        let raw = sign_init_data(&[("auth_date", "1700000000")], TOKEN);
        let response = server
            .get("/api/stats")
            .add_header(
                HeaderName::from_static("telegram-data"),
                HeaderValue::from_str(&raw).unwrap(),
            )
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "User not identified");
    }

    #[tokio::test]
    async fn test_my_stats() {
        let (server, _) = make_test_server().await;
        let (name, value) = signed_header(42);
        let response = server.get("/api/stats").add_header(name, value).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["isAdmin"], false);
        assert_eq!(body["stats"]["message_count"], 2);
        assert_eq!(body["stats"]["word_count"], 10);
        assert_eq!(body["stats"]["average_words"], 5);
        assert_eq!(body["groupsForUser"][0]["id"], -100);
        assert_eq!(body["groupsForUser"][0]["title"], "Rustaceans");
    }

    #[tokio::test]
    async fn test_my_stats_for_unknown_user() {
        let (server, _) = make_test_server().await;
        let (name, value) = signed_header(OWNER);
        let body: serde_json::Value = server.get("/api/stats").add_header(name, value).await.json();
        assert!(body["stats"].is_null());
        assert_eq!(body["isAdmin"], true);
        assert!(body["groupsForUser"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_stats_for_member_and_outsider() {
        let (server, _) = make_test_server().await;

        let (name, value) = signed_header(43);
        let response = server.get("/api/stats/-100").add_header(name, value).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["group"]["title"], "Rustaceans");
        assert_eq!(body["group"]["users"], 2);
        assert_eq!(body["users"][0]["user_id"], 42);

        let (name, value) = signed_header(99);
        let response = server.get("/api/stats/-100").add_header(name, value).await;
        response.assert_status(StatusCode::FORBIDDEN);

        let (name, value) = signed_header(OWNER);
        let response = server.get("/api/stats/-555").add_header(name, value).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_non_admins() {
        let (server, _) = make_test_server().await;
        for path in ["/api/users", "/api/top-users", "/api/groups", "/api/known-groups"] {
            let (name, value) = signed_header(42);
            let response = server.get(path).add_header(name, value).await;
            response.assert_status(StatusCode::FORBIDDEN);
            let body: serde_json::Value = response.json();
            assert_eq!(body["error"], "Unauthorized");
        }
    }

    #[tokio::test]
    async fn test_admin_users_page() {
        let (server, _) = make_test_server().await;
        let (name, value) = signed_header(8);
        let response = server
            .get("/api/top-users")
            .add_query_param("page", 1)
            .add_header(name, value)
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["totalPages"], 1);
        let users = body["users"].as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["user_id"], 42);
    }

    #[tokio::test]
    async fn test_admin_groups_page() {
        let (server, _) = make_test_server().await;
        let (name, value) = signed_header(OWNER);
        let body: serde_json::Value = server
            .get("/api/groups")
            .add_header(name, value)
            .await
            .json();
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["groups"][0]["group_id"], -100);
        assert_eq!(body["groups"][0]["message_count"], 3);
    }

    #[tokio::test]
    async fn test_admin_known_groups() {
        let (server, _) = make_test_server().await;
        let (name, value) = signed_header(OWNER);
        let body: serde_json::Value = server
            .get("/api/known-groups")
            .add_header(name, value)
            .await
            .json();
        assert_eq!(body["groups"][0]["id"], -100);
        assert_eq!(body["groups"][0]["title"], "Rustaceans");
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>stats</h1>").unwrap();

        let store = storage::connect("sqlite::memory:").await.unwrap();
        let config = ApiConfig::new("127.0.0.1", 0, TOKEN).with_static_dir(dir.path());
        let state = AppState::new(config, StatsQuery::new(store));
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_text("<h1>stats</h1>");
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let (server, _) = make_test_server().await;
        let response = server
            .get("/health")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://web.telegram.org"),
            )
            .await;
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[test]
    fn test_header_name_matches() {
        assert_eq!(
            HeaderName::from_static("telegram-data"),
            HeaderName::from_bytes(TELEGRAM_DATA_HEADER.as_bytes()).unwrap()
        );
    }
}
