//! Test utilities and common setup.

use std::fs;
use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use qianliclaw::PathResolver;
use qianliclaw::api::{self, AppState};
use qianliclaw::settings::SettingsStore;
use qianliclaw::status::HealthChecker;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A console server over a throwaway home directory.
pub struct TestConsole {
    pub home: TempDir,
    pub app: Router,
}

impl TestConsole {
    pub fn new() -> Self {
        let home = TempDir::new().unwrap();
        let resolver = PathResolver::new(home.path(), None);
        let settings = SettingsStore::in_home(home.path());
        let state = AppState::new(resolver, settings, HealthChecker::default());
        let app = api::create_router(state);
        Self { home, app }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.home.path().join(relative)
    }

    /// Write `~/.openclaw/openclaw.json` verbatim.
    pub fn write_config(&self, text: &str) {
        let dir = self.path(".openclaw");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("openclaw.json"), text).unwrap();
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().uri(uri).method(method);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::POST, uri, body).await
    }
}
