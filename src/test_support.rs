// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process mock of the PrimeVault API for client tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use aws_sdk_kms::config::{retry::RetryConfig, BehaviorVersion, Credentials, Region};
use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use serde_json::Value;

use crate::{
    client::ApiClient,
    config::ClientConfig,
    keys::{generate_public_private_key_pair, LocalKeyPair},
    signing::PrivateKeySigner,
};

pub(crate) const TEST_API_KEY: &str = "test-api-key";

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Path plus query string, as the client signed it.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Clone, Default)]
struct Shared {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<Reply>>>,
}

pub(crate) struct MockServer {
    pub url: String,
    shared: Shared,
}

impl MockServer {
    pub async fn start() -> Self {
        let shared = Shared::default();
        let app = Router::new().fallback(record).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            shared,
        }
    }

    /// Queue a JSON response. Unqueued requests get `200 {}`.
    pub fn respond(&self, status: u16, body: Value) {
        self.push(status, "application/json", body.to_string());
    }

    pub fn respond_text(&self, status: u16, body: &str) {
        self.push(status, "text/plain", body.to_string());
    }

    /// Queue a reply in the AWS JSON 1.1 protocol used by KMS.
    pub fn respond_kms(&self, status: u16, body: Value) {
        self.push(status, "application/x-amz-json-1.1", body.to_string());
    }

    fn push(&self, status: u16, content_type: &'static str, body: String) {
        self.shared.responses.lock().unwrap().push_back(Reply {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body,
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request received")
    }
}

async fn record(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    shared.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let reply = shared.responses.lock().unwrap().pop_front().unwrap_or(Reply {
        status: StatusCode::OK,
        content_type: "application/json",
        body: "{}".to_string(),
    });
    (reply.status, [(header::CONTENT_TYPE, reply.content_type)], reply.body)
}

/// A KMS client whose endpoint is `server`, with static credentials and no
/// retries.
pub(crate) fn kms_test_client(server: &MockServer) -> aws_sdk_kms::Client {
    let config = aws_sdk_kms::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-north-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(&server.url)
        .retry_config(RetryConfig::disabled())
        .build();
    aws_sdk_kms::Client::from_conf(config)
}

/// A client signing with a fresh local key, pointed at `server`.
pub(crate) fn test_client(server: &MockServer) -> (ApiClient, LocalKeyPair) {
    let pair = generate_public_private_key_pair().unwrap();
    let signer = PrivateKeySigner::from_pem(&pair.private_key_pem).unwrap();
    let client = ApiClient::with_signer(
        ClientConfig::default(),
        TEST_API_KEY,
        &server.url,
        Arc::new(signer),
    )
    .unwrap();
    (client, pair)
}
