// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request signing.
//!
//! Every signed request goes through a [`RequestSigner`]. Two implementations
//! exist:
//! - [`PrivateKeySigner`] - a P-256 key held in process memory
//! - [`KmsSigner`] - a P-256 key held in AWS KMS, used through `kms:Sign`
//!
//! Both return DER-encoded ECDSA signatures over SHA-256, so the server
//! verifies them the same way. The signer is chosen once, when the client is
//! built, by [`signer_for`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ClientConfig, SignatureService};
use crate::error::SdkError;

pub mod kms;
pub mod private_key;

pub use kms::KmsSigner;
pub use private_key::{verify_signature, PrivateKeySigner};

/// Capability to sign canonical request bytes.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Sign `message`, returning a DER-encoded ECDSA signature.
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError>;

    /// Which signature service this signer implements.
    fn service(&self) -> SignatureService;
}

/// Errors raised while loading keys or producing signatures.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signing failed: {0}")]
    Crypto(String),

    #[error("KMS error: {0}")]
    Kms(String),
}

/// Key material supplied when building a client.
///
/// Exactly one field must be set, and it must match the configured
/// [`SignatureService`].
#[derive(Clone, Default)]
pub struct SigningCredentials {
    /// PEM (or hex-encoded PKCS#8 DER) private key for local signing.
    pub private_key: Option<Vec<u8>>,
    /// KMS key id or ARN for remote signing.
    pub key_id: Option<String>,
}

impl SigningCredentials {
    pub fn private_key(pem: impl Into<Vec<u8>>) -> Self {
        Self {
            private_key: Some(pem.into()),
            key_id: None,
        }
    }

    pub fn kms_key(key_id: impl Into<String>) -> Self {
        Self {
            private_key: None,
            key_id: Some(key_id.into()),
        }
    }
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("key_id", &self.key_id)
            .finish()
    }
}

/// Key material after it has been checked against the configuration.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ResolvedCredentials<'a> {
    PrivateKey(&'a [u8]),
    Kms(&'a str),
}

/// Check that the supplied key material matches the configured service.
pub(crate) fn resolve_credentials<'a>(
    service: SignatureService,
    credentials: &'a SigningCredentials,
) -> Result<ResolvedCredentials<'a>, SdkError> {
    let private_key = credentials
        .private_key
        .as_deref()
        .filter(|key| !key.iter().all(u8::is_ascii_whitespace));
    let key_id = credentials
        .key_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match (service, private_key, key_id) {
        (SignatureService::PrivateKey, Some(key), None) => Ok(ResolvedCredentials::PrivateKey(key)),
        (SignatureService::AwsKms, None, Some(id)) => Ok(ResolvedCredentials::Kms(id)),
        (SignatureService::PrivateKey, None, _) => Err(SdkError::Configuration(
            "SIGNATURE_SERVICE is PRIVATE_KEY but no private key was provided".to_string(),
        )),
        (SignatureService::PrivateKey, Some(_), Some(_)) => Err(SdkError::Configuration(
            "SIGNATURE_SERVICE is PRIVATE_KEY but a KMS key id was also provided".to_string(),
        )),
        (SignatureService::AwsKms, _, None) => Err(SdkError::Configuration(
            "SIGNATURE_SERVICE is AWS_KMS but no KMS key id was provided".to_string(),
        )),
        (SignatureService::AwsKms, Some(_), Some(_)) => Err(SdkError::Configuration(
            "SIGNATURE_SERVICE is AWS_KMS but a private key was also provided".to_string(),
        )),
    }
}

/// Build the signer selected by `config`.
pub async fn signer_for(
    config: &ClientConfig,
    credentials: &SigningCredentials,
) -> Result<Arc<dyn RequestSigner>, SdkError> {
    match resolve_credentials(config.signature_service, credentials)? {
        ResolvedCredentials::PrivateKey(key) => Ok(Arc::new(PrivateKeySigner::from_bytes(key)?)),
        ResolvedCredentials::Kms(key_id) => Ok(Arc::new(KmsSigner::new(config, key_id).await)),
    }
}
