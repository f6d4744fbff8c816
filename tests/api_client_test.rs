use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

use evcal::config::ApiConfig;
use evcal::domain::{EventQuery, NewEvent, OrderBy};
use evcal::infrastructure::{ApiClient, ApiError, EventsApi};
use evcal::store::TokenStore;

const TOKEN: &str = "tok-1";

struct TestContext {
    server: MockServer,
    client: ApiClient,
}

impl TestContext {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let config = ApiConfig {
            base_url: server.uri(),
            client_id: "calendar-cli".to_string(),
            client_secret: "s3cret".to_string(),
            timeout_secs: 5,
        };
        let tokens = TokenStore::open_in_memory().expect("in-memory token store");
        let client = ApiClient::new(config, tokens).expect("client");
        Self { server, client }
    }

    async fn mock_auth_success(&self) {
        Mock::given(method("POST"))
            .and(path("/auth"))
            .and(body_json(json!({
                "clientId": "calendar-cli",
                "clientSecret": "s3cret"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TOKEN,
                "expires_in": 3600
            })))
            .mount(&self.server)
            .await;
    }

    /// Authenticated client, ready for listing calls
    async fn signed_in() -> Self {
        let ctx = Self::new().await;
        ctx.mock_auth_success().await;
        ctx.client.authenticate().await.expect("login");
        ctx
    }

    async fn mock_events_status(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }
}

fn rows(n: usize) -> Vec<serde_json::Value> {
    (0..n)
        .map(|i| json!({ "id": i + 100, "title": format!("Planning {i}") }))
        .collect()
}

#[tokio::test]
async fn test_authenticate_stores_token_and_bearer_is_sent() {
    let ctx = TestContext::new().await;
    ctx.mock_auth_success().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": rows(2),
            "totalCount": 2
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    assert!(!ctx.client.is_authenticated());
    ctx.client.authenticate().await.expect("login");
    assert!(ctx.client.is_authenticated());

    let page = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect("list");
    assert_eq!(page.items.len(), 2);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn test_authenticate_failure() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&ctx.server)
        .await;

    let err = ctx.client.authenticate().await.expect_err("login must fail");
    assert!(matches!(err, ApiError::Authentication(_)));
    assert!(!ctx.client.is_authenticated());
}

#[tokio::test]
async fn test_second_page_query_and_normalization() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("$skip", "6"))
        .and(query_param("$top", "6"))
        .and(query_param("$orderby", "startDate desc"))
        .and(query_param_is_missing("$filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": rows(5),
            "totalCount": 11
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut query = EventQuery::with_page_size(6);
    query.page = 2;
    let page = ctx.client.list_events(&query).await.expect("list");

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_count, 11);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn test_first_page_omits_skip_and_sends_filter() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param_is_missing("$skip"))
        .and(query_param("$top", "12"))
        .and(query_param("$orderby", "title asc"))
        .and(query_param(
            "$filter",
            "contains(tolower(title), 'o''brien') or contains(tolower(description), 'o''brien')",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": rows(12),
            "total": 30
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut query = EventQuery::with_page_size(12);
    query.set_search("O'Brien");
    query.set_order(OrderBy::TitleAsc);
    let page = ctx.client.list_events(&query).await.expect("list");

    assert_eq!(page.total_count, 30);
    assert!(page.has_next_page);
}

#[tokio::test]
async fn test_unauthorized_clears_token() {
    let ctx = TestContext::signed_in().await;
    ctx.mock_events_status(ResponseTemplate::new(401)).await;

    let err = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect_err("401");
    assert_eq!(err, ApiError::SessionExpired);
    assert!(!ctx.client.is_authenticated());
}

#[tokio::test]
async fn test_bad_request_with_invalid_token_challenge_expires_session() {
    let ctx = TestContext::signed_in().await;
    ctx.mock_events_status(
        ResponseTemplate::new(400)
            .insert_header("WWW-Authenticate", "Bearer error=\"invalid_token\""),
    )
    .await;

    let err = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect_err("400");
    assert_eq!(err, ApiError::SessionExpired);
    assert!(!ctx.client.is_authenticated());
}

#[tokio::test]
async fn test_plain_bad_request_keeps_session() {
    let ctx = TestContext::signed_in().await;
    ctx.mock_events_status(ResponseTemplate::new(400)).await;

    let err = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect_err("400");
    assert_eq!(err, ApiError::Unexpected(400));
    assert!(ctx.client.is_authenticated());
}

#[tokio::test]
async fn test_forbidden_keeps_token() {
    let ctx = TestContext::signed_in().await;
    ctx.mock_events_status(ResponseTemplate::new(403)).await;

    let err = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect_err("403");
    assert_eq!(err, ApiError::Forbidden);
    assert!(ctx.client.is_authenticated());
}

#[tokio::test]
async fn test_server_error() {
    let ctx = TestContext::signed_in().await;
    // a 5xx is reported once; only the user retries
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let err = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect_err("503");
    assert_eq!(err, ApiError::Server(503));
}

#[tokio::test]
async fn test_malformed_listing_is_empty_page() {
    let ctx = TestContext::signed_in().await;
    ctx.mock_events_status(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .await;

    let page = ctx
        .client
        .list_events(&EventQuery::default())
        .await
        .expect("list");
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn test_create_event_posts_camel_case_body() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({
            "title": "Retro",
            "description": "",
            "startDate": "2024-06-01T09:00:00",
            "endDate": "2024-06-01T10:00:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "evt-9",
            "title": "Retro",
            "startDate": "2024-06-01T09:00:00",
            "endDate": "2024-06-01T10:00:00"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let created = ctx
        .client
        .create_event(&NewEvent {
            title: "Retro".to_string(),
            description: String::new(),
            start_date: "2024-06-01T09:00:00".to_string(),
            end_date: "2024-06-01T10:00:00".to_string(),
        })
        .await
        .expect("create");
    assert_eq!(created.title, "Retro");
    assert_eq!(created.id.map(|id| id.to_string()).as_deref(), Some("evt-9"));
}

#[tokio::test]
async fn test_logout_drops_token() {
    let ctx = TestContext::signed_in().await;
    assert!(ctx.client.is_authenticated());
    ctx.client.logout().expect("logout");
    assert!(!ctx.client.is_authenticated());
}
