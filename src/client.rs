// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed HTTP client for the PrimeVault API.
//!
//! Every request carries a freshly issued bearer token bound to its path and
//! body. POST bodies are additionally signed and the hex signature is sent
//! inside the body as `dataSignatureHex`. Endpoint wrappers live in
//! [`crate::api`] as further `impl ApiClient` blocks.

use std::sync::Arc;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::AuthTokenService;
use crate::canonical::compact;
use crate::config::ClientConfig;
use crate::error::{ApiError, SdkError};
use crate::signing::{signer_for, RequestSigner, SigningCredentials};

/// Body field carrying the hex signature of the request body.
pub const DATA_SIGNATURE_FIELD: &str = "dataSignatureHex";

#[derive(Clone)]
pub struct ApiClient {
    api_key: String,
    api_url: String,
    http: Client,
    tokens: AuthTokenService,
    signer: Arc<dyn RequestSigner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.api_url)
            .field("signature_service", &self.signer.service())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client, choosing the signer from `config.signature_service`.
    ///
    /// Fails with [`SdkError::Configuration`] when the credentials do not
    /// match the configured service.
    pub async fn new(
        config: ClientConfig,
        api_key: impl Into<String>,
        api_url: &str,
        credentials: SigningCredentials,
    ) -> Result<Self, SdkError> {
        let signer = signer_for(&config, &credentials).await?;
        Self::with_signer(config, api_key, api_url, signer)
    }

    /// Build a client around an existing signer.
    pub fn with_signer(
        config: ClientConfig,
        api_key: impl Into<String>,
        api_url: &str,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, SdkError> {
        if signer.service() != config.signature_service {
            return Err(SdkError::Configuration(format!(
                "signer implements {} but SIGNATURE_SERVICE is {}",
                signer.service(),
                config.signature_service
            )));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SdkError::Configuration("API key is empty".to_string()));
        }

        let parsed = Url::parse(api_url)
            .map_err(|e| SdkError::Configuration(format!("invalid API URL {api_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SdkError::Configuration(format!(
                "API URL must be http or https, got {}",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SdkError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let tokens = AuthTokenService::new(api_key.clone(), config.token_expires_in, signer.clone());

        Ok(Self {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            http,
            tokens,
            signer,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Signed GET. `path` may already contain a query string, which is then
    /// part of the signed path; `params` are appended unsigned.
    pub async fn get(&self, path: &str, params: Option<&[(&str, &str)]>) -> Result<Value, SdkError> {
        self.request(Method::GET, path, params, None).await
    }

    /// Signed POST with an optional JSON body.
    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, SdkError> {
        self.request(Method::POST, path, None, body).await
    }

    pub(crate) async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        decode(path, self.get(path, None).await?)
    }

    pub(crate) async fn get_as_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SdkError> {
        decode(path, self.get(path, Some(params)).await?)
    }

    pub(crate) async fn post_as<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, SdkError> {
        decode(path, self.post(path, Some(body)).await?)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, &str)]>,
        body: Option<Value>,
    ) -> Result<Value, SdkError> {
        let token = self.tokens.generate_auth_token(path, body.as_ref()).await?;
        let body = match body {
            Some(body) => self.attach_data_signature(body).await?,
            None => None,
        };

        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.api_url, path))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Api-Key", &self.api_key)
            .header("Authorization", format!("Bearer {token}"));
        if let Some(params) = params {
            request = request.query(params);
        }
        if let Some(body) = &body {
            request = request.body(serde_json::to_vec(body)?);
        }

        debug!(method = %method, path = %path, "sending signed request");

        let response = request
            .send()
            .await
            .map_err(|e| SdkError::Transport(format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(format!("{method} {path} body read failed: {e}")))?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &text);
            warn!(method = %method, path = %path, status = %status, code = ?err.code, "request rejected");
            return Err(err.into());
        }

        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Add `dataSignatureHex` to a non-empty object body.
    ///
    /// Empty and null bodies are sent unchanged.
    async fn attach_data_signature(&self, body: Value) -> Result<Option<Value>, SdkError> {
        let mut fields = match body {
            Value::Null => return Ok(None),
            Value::Object(fields) if fields.is_empty() => return Ok(Some(Value::Object(fields))),
            Value::Object(fields) => fields,
            other => return Ok(Some(other)),
        };

        let payload = compact(&Value::Object(fields.clone()))?;
        let signature = self.signer.sign(payload.as_bytes()).await?;
        fields.insert(DATA_SIGNATURE_FIELD.to_string(), Value::String(hex::encode(signature)));
        Ok(Some(Value::Object(fields)))
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value)
        .map_err(|e| SdkError::InvalidResponse(format!("unexpected response from {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{body_digest, verify_auth_token};
    use crate::config::SignatureService;
    use crate::error::ApiErrorKind;
    use crate::signing::verify_signature;
    use crate::test_support::{test_client, MockServer, TEST_API_KEY};
    use base64ct::{Base64, Base64Url, Encoding};
    use serde_json::json;

    #[tokio::test]
    async fn get_sends_auth_headers() {
        let server = MockServer::start().await;
        let (client, pair) = test_client(&server);
        server.respond(200, json!([{"value": "ETHEREUM", "label": "Ethereum", "logo": ""}]));

        let response = client.get("/api/external/assets/supported_chains/", None).await.unwrap();
        assert_eq!(response[0]["value"], "ETHEREUM");

        let request = server.last_request();
        assert_eq!(request.method, axum::http::Method::GET);
        assert_eq!(request.path, "/api/external/assets/supported_chains/");
        assert_eq!(request.header("api-key"), Some(TEST_API_KEY));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert!(request.body.is_empty());

        let token = request
            .header("authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
            .unwrap();
        let claims = verify_auth_token(token, &pair.public_key_der).unwrap();
        assert_eq!(claims.url_path, "/api/external/assets/supported_chains/");
        assert_eq!(claims.user_id, TEST_API_KEY);
        assert_eq!(claims.body, body_digest(None).unwrap());
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[tokio::test]
    async fn post_signs_body_and_token_covers_unsigned_body() {
        let server = MockServer::start().await;
        let (client, pair) = test_client(&server);

        let body = json!({"vaultName": "core-vault-1", "defaultTradeSpendLimit": {"amount": "10"}});
        client.post("/api/external/vaults/", Some(body.clone())).await.unwrap();

        let request = server.last_request();
        let mut sent = request.json();
        let signature_hex = sent
            .as_object_mut()
            .and_then(|fields| fields.remove(DATA_SIGNATURE_FIELD))
            .and_then(|value| value.as_str().map(str::to_string))
            .expect("dataSignatureHex present");
        assert_eq!(sent, body);

        let signature = hex::decode(signature_hex).unwrap();
        let signed = compact(&body).unwrap();
        verify_signature(&pair.public_key_der, signed.as_bytes(), &signature).unwrap();

        let token = request.header("authorization").unwrap().trim_start_matches("Bearer ");
        let claims = verify_auth_token(token, &pair.public_key_der).unwrap();
        assert_eq!(claims.body, body_digest(Some(&body)).unwrap());
    }

    #[tokio::test]
    async fn post_without_body_sends_nothing() {
        let server = MockServer::start().await;
        let (client, _) = test_client(&server);

        client.post("/api/external/vaults/v-1/update_balances/", None).await.unwrap();
        client.post("/api/external/vaults/v-1/update_balances/", Some(json!({}))).await.unwrap();

        let requests = server.requests();
        assert!(requests[0].body.is_empty());
        assert_eq!(requests[1].json(), json!({}));
    }

    #[tokio::test]
    async fn params_are_sent_as_query_string() {
        let server = MockServer::start().await;
        let (client, pair) = test_client(&server);

        client
            .get(
                "/api/external/transactions/trade_quote/",
                Some(&[("vaultId", "v-1"), ("slippage", "0.5")]),
            )
            .await
            .unwrap();

        let request = server.last_request();
        assert_eq!(request.query.as_deref(), Some("vaultId=v-1&slippage=0.5"));
        let token = request.header("authorization").unwrap().trim_start_matches("Bearer ");
        let claims = verify_auth_token(token, &pair.public_key_der).unwrap();
        assert_eq!(claims.url_path, "/api/external/transactions/trade_quote/");
    }

    #[tokio::test]
    async fn non_json_response_is_returned_as_string() {
        let server = MockServer::start().await;
        let (client, _) = test_client(&server);
        server.respond_text(200, "OK");

        let response = client.get("/api/external/assets/", None).await.unwrap();
        assert_eq!(response, Value::String("OK".to_string()));
    }

    #[tokio::test]
    async fn error_status_maps_to_api_error() {
        let server = MockServer::start().await;
        let (client, _) = test_client(&server);
        server.respond(400, json!({"message": "Invalid amount", "code": "INVALID_AMOUNT"}));
        server.respond_text(503, "maintenance");

        let err = client
            .post("/api/external/transactions/", Some(json!({"amount": "-1"})))
            .await
            .unwrap_err();
        let api = err.as_api_error().expect("API error");
        assert_eq!(api.kind(), ApiErrorKind::BadRequest);
        assert_eq!(api.message, "Invalid amount");
        assert_eq!(api.code.as_deref(), Some("INVALID_AMOUNT"));

        let err = client.get("/api/external/assets/", None).await.unwrap_err();
        let api = err.as_api_error().expect("API error");
        assert_eq!(api.kind(), ApiErrorKind::ServiceUnavailable);
        assert_eq!(api.message, "maintenance");

        // Nothing is retried.
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let pair = crate::keys::generate_public_private_key_pair().unwrap();
        let client = ApiClient::new(
            ClientConfig::default(),
            "key",
            "http://127.0.0.1:9",
            SigningCredentials::private_key(pair.private_key_pem),
        )
        .await
        .unwrap();

        let err = client.get("/api/external/assets/", None).await.unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
    }

    #[tokio::test]
    async fn mismatched_credentials_fail_construction() {
        let kms = SigningCredentials::kms_key("arn:aws:kms:eu-north-1:111122223333:key/abc");
        let err = ApiClient::new(ClientConfig::private_key(), "key", "https://api.example.com", kms)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Configuration(_)));

        let pair = crate::keys::generate_public_private_key_pair().unwrap();
        let local = SigningCredentials::private_key(pair.private_key_pem);
        let err = ApiClient::new(ClientConfig::aws_kms("eu-north-1"), "key", "https://api.example.com", local)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Configuration(_)));
    }

    #[tokio::test]
    async fn invalid_url_or_signer_mismatch_is_rejected() {
        let pair = crate::keys::generate_public_private_key_pair().unwrap();
        let signer: Arc<dyn RequestSigner> =
            Arc::new(crate::signing::PrivateKeySigner::from_pem(&pair.private_key_pem).unwrap());

        assert!(ApiClient::with_signer(ClientConfig::default(), "key", "not a url", signer.clone()).is_err());
        assert!(ApiClient::with_signer(ClientConfig::default(), "key", "ftp://host", signer.clone()).is_err());
        assert!(ApiClient::with_signer(ClientConfig::default(), " ", "https://host", signer.clone()).is_err());

        let kms_config = ClientConfig::default().with_signature_service(SignatureService::AwsKms);
        let err = ApiClient::with_signer(kms_config, "key", "https://host", signer).unwrap_err();
        assert!(matches!(err, SdkError::Configuration(_)));
    }

    #[tokio::test]
    async fn trailing_slash_on_base_url_is_trimmed() {
        let server = MockServer::start().await;
        let pair = crate::keys::generate_public_private_key_pair().unwrap();
        let client = ApiClient::new(
            ClientConfig::default(),
            "key",
            &format!("{}/", server.url),
            SigningCredentials::private_key(pair.private_key_pem),
        )
        .await
        .unwrap();
        assert_eq!(client.api_url(), server.url);

        client.get("/api/external/assets/", None).await.unwrap();
        assert_eq!(server.last_request().path, "/api/external/assets/");
    }

    #[tokio::test]
    async fn kms_signer_signs_token_and_body() {
        let api = MockServer::start().await;
        let kms = MockServer::start().await;
        let token_signature = b"token-signature-from-kms".to_vec();
        let body_signature = b"body-signature-from-kms".to_vec();
        kms.respond_kms(200, json!({"KeyId": "key-1", "Signature": Base64::encode_string(&token_signature)}));
        kms.respond_kms(200, json!({"KeyId": "key-1", "Signature": Base64::encode_string(&body_signature)}));

        let config = ClientConfig::aws_kms("eu-north-1");
        let signer = crate::signing::KmsSigner::with_client(
            crate::test_support::kms_test_client(&kms),
            "key-1",
            &config.kms_signing_algorithm,
        );
        let client = ApiClient::with_signer(config, TEST_API_KEY, &api.url, Arc::new(signer)).unwrap();

        let body = json!({"vaultName": "kms-vault"});
        client.post("/api/external/vaults/", Some(body.clone())).await.unwrap();

        let request = api.last_request();
        let token = request.header("authorization").unwrap().trim_start_matches("Bearer ");
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        assert_eq!(signature, Base64Url::encode_string(&token_signature));

        let sent = request.json();
        assert_eq!(sent[DATA_SIGNATURE_FIELD], hex::encode(&body_signature));
        assert_eq!(sent["vaultName"], "kms-vault");

        let kms_requests = kms.requests();
        assert_eq!(kms_requests.len(), 2);
        for kms_request in &kms_requests {
            assert_eq!(kms_request.header("x-amz-target"), Some("TrentService.Sign"));
            assert_eq!(kms_request.json()["KeyId"], "key-1");
            assert_eq!(kms_request.json()["SigningAlgorithm"], "ECDSA_SHA_256");
        }
        let signed = |i: usize| Base64::decode_vec(kms_requests[i].json()["Message"].as_str().unwrap()).unwrap();
        assert_eq!(signed(0), signing_input.as_bytes());
        assert_eq!(signed(1), compact(&body).unwrap().as_bytes());
    }
}
