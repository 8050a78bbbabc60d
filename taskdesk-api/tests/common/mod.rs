//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-process router over in-memory stores
//! - Test user creation and JWT token generation
//! - A request helper returning status, headers and JSON body
//! - A task store that fails every call

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::{ApiConfig, Config, JwtConfig, StorageBackend};
use taskdesk_shared::auth::jwt::{create_token, Claims, TokenType};
use taskdesk_shared::models::task::{NewTask, Task, TaskStatus};
use taskdesk_shared::models::user::NewUser;
use taskdesk_shared::store::memory::InMemoryUserRepository;
use taskdesk_shared::store::{StoreError, StoreResult, TaskRepository};
use taskdesk_shared::tasks::TaskFilter;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Configuration for in-memory tests
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        storage: StorageBackend::Memory,
        database: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_ttl_seconds: 3600,
        },
    }
}

/// A user created directly in the store, with a valid access token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing the router and its state
pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a context over empty in-memory stores
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory(test_config()))
    }

    /// Creates a context whose task store is `tasks`
    pub fn with_task_repository(tasks: Arc<dyn TaskRepository>) -> Self {
        Self::with_state(AppState::new(
            tasks,
            Arc::new(InMemoryUserRepository::new()),
            test_config(),
        ))
    }

    fn with_state(state: AppState) -> Self {
        let app = build_router(state.clone());
        Self { state, app }
    }

    /// Inserts a user straight into the store and issues an access token
    pub async fn user(&self, username: &str) -> TestUser {
        let user = self
            .state
            .users
            .insert(NewUser {
                username: username.to_string(),
                password_hash: "not-used".to_string(),
                salt: "not-used".to_string(),
            })
            .await
            .expect("Failed to insert test user");

        let claims = Claims::new(user.id, user.username.clone(), TokenType::Access);
        let token = create_token(&claims, TEST_JWT_SECRET).expect("Failed to create token");

        TestUser {
            id: user.id,
            username: user.username,
            token,
        }
    }

    /// Sends a request through the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a prebuilt request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates a task over HTTP and returns its JSON
    pub async fn create_task(&self, user: &TestUser, title: &str, description: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/tasks",
                Some(&user.token),
                Some(serde_json::json!({ "title": title, "description": description })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }
}

/// Task store that fails every call
pub struct FailingTaskRepository;

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl TaskRepository for FailingTaskRepository {
    async fn insert(&self, _owner_id: i64, _task: NewTask) -> StoreResult<Task> {
        Err(unavailable())
    }

    async fn find_by_id_and_owner(&self, _id: i64, _owner_id: i64) -> StoreResult<Option<Task>> {
        Err(unavailable())
    }

    async fn list_by_owner(&self, _owner_id: i64, _filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        Err(unavailable())
    }

    async fn update_status(
        &self,
        _id: i64,
        _owner_id: i64,
        _status: TaskStatus,
    ) -> StoreResult<Option<Task>> {
        Err(unavailable())
    }

    async fn delete_by_id_and_owner(&self, _id: i64, _owner_id: i64) -> StoreResult<bool> {
        Err(unavailable())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Err(unavailable())
    }
}
