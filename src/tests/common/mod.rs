// tests/common/mod.rs
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use http::Method;
use serde_json::Value;

use crate::config::settings::ConnectionConfig;
use crate::config::token::TokenConfig;
use crate::consul::transport::{ApiRequest, ApiResponse, Transport, TransportError};

pub use serde_json::json;

/// In-memory agent: replies are queued per (method, path), requests are recorded.
#[derive(Default)]
pub struct FakeAgent {
    replies: Mutex<HashMap<(Method, String), VecDeque<Result<ApiResponse, String>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(self, version: &str) -> Self {
        self.reply(
            Method::GET,
            "/agent/self",
            200,
            json!({"Config": {"Version": version, "Datacenter": "dc1"}}),
        )
    }

    pub fn reply(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.reply_raw(method, path, status, &body.to_string())
    }

    pub fn reply_raw(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.push(
            method,
            path,
            Ok(ApiResponse {
                status,
                body: body.to_owned(),
            }),
        )
    }

    pub fn unreachable(self, method: Method, path: &str) -> Self {
        self.push(method, path, Err("connection refused".to_owned()))
    }

    fn push(self, method: Method, path: &str, reply: Result<ApiResponse, String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|request| (request.method, request.path))
            .collect()
    }

    pub fn body_of(&self, method: Method, path: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .find(|request| request.method == method && request.path == path)
            .and_then(|request| request.body)
    }
}

impl Transport for &FakeAgent {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = (request.method.clone(), request.path.clone());
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Ok(ApiResponse {
                status: 404,
                body: format!("no reply scripted for {} {}", key.0, key.1),
            }),
        }
    }
}

pub fn connection() -> ConnectionConfig {
    ConnectionConfig::default()
}

pub fn token_config(id: &str) -> TokenConfig {
    TokenConfig::new(id)
}

/// A token document as the agent would return it.
pub fn remote_token(accessor_id: &str, description: &str, policies: Value) -> Value {
    json!({
        "AccessorID": accessor_id,
        "SecretID": "6a1253d2-1785-24fd-91c2-f8e78c745511",
        "Description": description,
        "Policies": policies,
        "Local": false,
        "CreateTime": "2020-05-01T10:00:00Z",
        "Hash": "UuiRkOQPRCvoRZHRtUxxbrmwZ5crYrOdZ0Z1FTFbTbA=",
        "CreateIndex": 59,
        "ModifyIndex": 59
    })
}
