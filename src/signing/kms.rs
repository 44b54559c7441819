// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AWS KMS signing.
//!
//! The private key never leaves KMS. Credentials come from the ambient AWS
//! provider chain (`AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`, profile,
//! instance role). Failed calls are returned as [`SigningError::Kms`] and
//! never retried here.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_kms::{
    config::Region,
    error::DisplayErrorContext,
    primitives::Blob,
    types::{MessageType, SigningAlgorithmSpec},
    Client,
};
use tracing::debug;

use super::{RequestSigner, SigningError};
use crate::config::{ClientConfig, SignatureService};

/// Build a KMS client for `region` from the ambient AWS configuration.
pub async fn kms_client(region: &str) -> Client {
    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&shared)
}

/// Signs requests with `kms:Sign` on a KMS-held key.
#[derive(Clone, Debug)]
pub struct KmsSigner {
    client: Client,
    key_id: String,
    algorithm: SigningAlgorithmSpec,
}

impl KmsSigner {
    /// Create a signer for `key_id` in the configured region.
    pub async fn new(config: &ClientConfig, key_id: impl Into<String>) -> Self {
        let client = kms_client(&config.aws_region).await;
        Self::with_client(client, key_id, &config.kms_signing_algorithm)
    }

    /// Create a signer around an existing KMS client.
    pub fn with_client(client: Client, key_id: impl Into<String>, algorithm: &str) -> Self {
        Self {
            client,
            key_id: key_id.into(),
            algorithm: SigningAlgorithmSpec::from(algorithm),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn algorithm(&self) -> &SigningAlgorithmSpec {
        &self.algorithm
    }
}

#[async_trait]
impl RequestSigner for KmsSigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        debug!(
            key_id = %self.key_id,
            algorithm = %self.algorithm.as_str(),
            len = message.len(),
            "signing with KMS"
        );

        let response = self
            .client
            .sign()
            .key_id(&self.key_id)
            .message(Blob::new(message.to_vec()))
            .message_type(MessageType::Raw)
            .signing_algorithm(self.algorithm.clone())
            .send()
            .await
            .map_err(|e| SigningError::Kms(format!("{}", DisplayErrorContext(&e))))?;

        response
            .signature
            .map(Blob::into_inner)
            .ok_or_else(|| SigningError::Kms("sign response did not include a signature".to_string()))
    }

    fn service(&self) -> SignatureService {
        SignatureService::AwsKms
    }
}
