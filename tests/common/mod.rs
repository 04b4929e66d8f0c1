#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use vehicle_booking::{
    config::EnvironmentConfig,
    create_app,
    models::{BoundaryPolicy, NewVehicle},
    repositories::InMemoryStore,
    state::AppState,
    utils::jwt::{generate_token, JwtConfig},
};

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    jwt: JwtConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn new(policy: BoundaryPolicy) -> Self {
        let policy_name = policy.as_str().to_string();
        let config = EnvironmentConfig::from_lookup(move |key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "STORAGE_BACKEND" => Some("memory".to_string()),
            "BOOKING_BOUNDARY_POLICY" => Some(policy_name.clone()),
            _ => None,
        })
        .expect("test configuration");

        let store = InMemoryStore::new(policy);
        let jwt = JwtConfig::from(&config);
        let router = create_app(AppState::in_memory(store.clone(), config));

        Self { router, store, jwt }
    }

    pub async fn add_vehicle(&self, vehicle: NewVehicle) -> i32 {
        self.store.add_vehicle(vehicle).await.id
    }

    pub fn token(&self, user_id: i32) -> String {
        generate_token(user_id, &self.jwt).expect("token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<i32>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, user_id: i32) -> TestResponse {
        self.request(Method::GET, uri, Some(user_id), None).await
    }

    pub async fn post(&self, uri: &str, user_id: i32, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(user_id), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user_id: i32, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(user_id), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user_id: i32) -> TestResponse {
        self.request(Method::DELETE, uri, Some(user_id), None).await
    }

    pub async fn available_ids(&self, start: &str, end: &str) -> Vec<i64> {
        let response = self
            .get(
                &format!("/api/vehicles/available?start_time={}&end_time={}", start, end),
                1,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["data"]
            .as_array()
            .expect("vehicle list")
            .iter()
            .map(|v| v["id"].as_i64().expect("id"))
            .collect()
    }
}
