// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ES256 bearer tokens for outgoing requests.
//!
//! ## Token Layout
//!
//! ```text
//! base64url(header) "." base64url(payload) "." base64url(signature)
//! ```
//!
//! - header: `{"alg":"ES256","typ":"JWT"}`
//! - payload: [`RequestClaims`] with sorted keys, no whitespace
//! - every segment is base64url **with** `=` padding
//! - signature: DER ECDSA over the ASCII `header.payload` string
//!
//! The `body` claim is the SHA-256 hex digest of the request body serialized
//! with sorted keys, `", "` / `": "` separators and ASCII escaping. A missing
//! or empty body hashes as `{}`.

use std::{sync::Arc, time::Duration};

use base64ct::{Base64Url, Encoding};
use chrono::Utc;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::claims::{RequestClaims, TOKEN_ALGORITHM, TOKEN_TYPE};
use crate::canonical::{to_canonical_string, JsonStyle};
use crate::error::SdkError;
use crate::signing::{verify_signature, RequestSigner};

/// Issues signed bearer tokens for one API user.
#[derive(Clone)]
pub struct AuthTokenService {
    api_key: String,
    expires_in: Duration,
    signer: Arc<dyn RequestSigner>,
}

impl AuthTokenService {
    pub fn new(api_key: impl Into<String>, expires_in: Duration, signer: Arc<dyn RequestSigner>) -> Self {
        Self {
            api_key: api_key.into(),
            expires_in,
            signer,
        }
    }

    /// Issue a token for `url_path` and `body`, valid from now.
    pub async fn generate_auth_token(
        &self,
        url_path: &str,
        body: Option<&Value>,
    ) -> Result<String, SdkError> {
        self.generate_auth_token_at(url_path, body, Utc::now().timestamp())
            .await
    }

    /// Issue a token with an explicit issue time.
    pub async fn generate_auth_token_at(
        &self,
        url_path: &str,
        body: Option<&Value>,
        issued_at: i64,
    ) -> Result<String, SdkError> {
        let lifetime = self.expires_in.as_secs();
        let exp = i64::try_from(lifetime)
            .ok()
            .and_then(|secs| issued_at.checked_add(secs))
            .ok_or_else(|| SdkError::Configuration(format!("token lifetime of {lifetime}s overflows expiry")))?;

        let claims = RequestClaims {
            body: body_digest(body)?,
            exp,
            iat: issued_at,
            url_path: url_path.to_string(),
            user_id: self.api_key.clone(),
        };

        let signing_input = encode_signing_input(&claims)?;
        let signature = self.signer.sign(signing_input.as_bytes()).await?;
        Ok(format!("{signing_input}.{}", Base64Url::encode_string(&signature)))
    }
}

/// SHA-256 hex digest of the canonical request body.
pub fn body_digest(body: Option<&Value>) -> Result<String, SdkError> {
    let empty = Value::Object(Default::default());
    let body = match body {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) if map.is_empty() => &empty,
        Some(other) => other,
    };
    let canonical = to_canonical_string(body, JsonStyle::SPACED_ASCII)?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}

/// The `header.payload` string that gets signed.
pub fn encode_signing_input(claims: &RequestClaims) -> Result<String, SdkError> {
    let header = json!({ "alg": TOKEN_ALGORITHM, "typ": TOKEN_TYPE });
    let payload = serde_json::to_value(claims)?;

    let encode = |value: &Value| -> Result<String, SdkError> {
        let json = to_canonical_string(value, JsonStyle::COMPACT_ASCII)?;
        Ok(Base64Url::encode_string(json.as_bytes()))
    };

    Ok(format!("{}.{}", encode(&header)?, encode(&payload)?))
}

/// Check a token's signature against a SPKI DER public key and return its claims.
///
/// Expiry is not checked; compare [`RequestClaims::exp`] yourself if needed.
pub fn verify_auth_token(token: &str, public_key_der: &[u8]) -> Result<RequestClaims, SdkError> {
    let malformed = |what: &str| SdkError::InvalidResponse(format!("malformed auth token: {what}"));

    let (signing_input, signature_b64) = token.rsplit_once('.').ok_or_else(|| malformed("no signature"))?;
    let (header_b64, payload_b64) = signing_input
        .split_once('.')
        .ok_or_else(|| malformed("no payload"))?;

    let header: Value = decode_segment(header_b64).ok_or_else(|| malformed("header"))?;
    if header.get("alg").and_then(Value::as_str) != Some(TOKEN_ALGORITHM) {
        return Err(malformed("unexpected algorithm"));
    }
    let claims: RequestClaims = decode_segment(payload_b64).ok_or_else(|| malformed("payload"))?;

    let signature = Base64Url::decode_vec(signature_b64).map_err(|_| malformed("signature encoding"))?;
    verify_signature(public_key_der, signing_input.as_bytes(), &signature)?;
    Ok(claims)
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Option<T> {
    let bytes = Base64Url::decode_vec(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}
