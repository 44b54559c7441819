// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key pair generation for API users.
//!
//! The public half of a generated pair is registered with PrimeVault out of
//! band; the private half (or the KMS key id) is handed to the client.

use aws_sdk_kms::{
    error::DisplayErrorContext,
    types::{KeySpec, KeyUsageType, OriginType},
    Client,
};
use p256::{
    ecdsa::SigningKey,
    pkcs8::{DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding},
    PublicKey,
};
use rand::rngs::OsRng;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::signing::kms::kms_client;

/// Alias given to KMS keys when the caller does not choose one.
pub const DEFAULT_KMS_KEY_ALIAS: &str = "primevault-access-key";

const KMS_KEY_DESCRIPTION: &str = "Key for Signing PrimeVault requests";

/// A locally generated P-256 key pair.
#[derive(Clone)]
pub struct LocalKeyPair {
    /// PKCS#8 PEM private key, accepted by the client.
    pub private_key_pem: String,
    /// Hex of the PKCS#8 DER private key.
    pub private_key_hex: String,
    /// SubjectPublicKeyInfo PEM public key.
    pub public_key_pem: String,
    /// SubjectPublicKeyInfo DER public key.
    pub public_key_der: Vec<u8>,
    /// Hex of `public_key_der`, the form registered with the API.
    pub public_key_hex: String,
}

impl std::fmt::Debug for LocalKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeyPair")
            .field("public_key_hex", &self.public_key_hex)
            .finish_non_exhaustive()
    }
}

/// A key provisioned inside AWS KMS.
#[derive(Debug, Clone)]
pub struct KmsKeyPair {
    pub key_id: String,
    pub alias: String,
    pub public_key_der: Vec<u8>,
    pub public_key_hex: String,
    pub public_key_pem: String,
}

/// Generate a fresh P-256 key pair in memory.
pub fn generate_public_private_key_pair() -> Result<LocalKeyPair, SdkError> {
    let signing_key = SigningKey::random(&mut OsRng);

    let private_der = signing_key
        .to_pkcs8_der()
        .map_err(|e| SdkError::KeyGeneration(format!("PKCS#8 encoding failed: {e}")))?;
    let private_key_pem = signing_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| SdkError::KeyGeneration(format!("PKCS#8 PEM encoding failed: {e}")))?
        .to_string();

    let verifying_key = signing_key.verifying_key();
    let public_key_der = verifying_key
        .to_public_key_der()
        .map_err(|e| SdkError::KeyGeneration(format!("SPKI encoding failed: {e}")))?
        .as_bytes()
        .to_vec();
    let public_key_pem = verifying_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| SdkError::KeyGeneration(format!("SPKI PEM encoding failed: {e}")))?;

    Ok(LocalKeyPair {
        private_key_pem,
        private_key_hex: hex::encode(private_der.as_bytes()),
        public_key_pem,
        public_key_hex: hex::encode(&public_key_der),
        public_key_der,
    })
}

/// Provision a P-256 signing key in AWS KMS and fetch its public key.
///
/// Uses the ambient AWS credentials and `config.aws_region`. The key gets the
/// alias `alias/<alias>` (default [`DEFAULT_KMS_KEY_ALIAS`]).
pub async fn generate_aws_kms_key_pair(
    config: &ClientConfig,
    alias: Option<&str>,
) -> Result<KmsKeyPair, SdkError> {
    let client = kms_client(&config.aws_region).await;
    info!(region = %config.aws_region, "provisioning KMS signing key");
    generate_aws_kms_key_pair_with_client(&client, alias).await
}

/// [`generate_aws_kms_key_pair`] against an existing KMS client.
pub async fn generate_aws_kms_key_pair_with_client(
    client: &Client,
    alias: Option<&str>,
) -> Result<KmsKeyPair, SdkError> {
    let alias = alias.unwrap_or(DEFAULT_KMS_KEY_ALIAS);

    let created = client
        .create_key()
        .description(KMS_KEY_DESCRIPTION)
        .key_usage(KeyUsageType::SignVerify)
        .key_spec(KeySpec::EccNistP256)
        .origin(OriginType::AwsKms)
        .send()
        .await
        .map_err(|e| SdkError::KeyGeneration(format!("CreateKey failed: {}", DisplayErrorContext(&e))))?;

    let key_id = created
        .key_metadata()
        .map(|metadata| metadata.key_id().to_string())
        .ok_or_else(|| SdkError::KeyGeneration("CreateKey returned no key metadata".to_string()))?;

    info!(key_id = %key_id, "created KMS signing key");

    client
        .create_alias()
        .alias_name(format!("alias/{alias}"))
        .target_key_id(&key_id)
        .send()
        .await
        .map_err(|e| SdkError::KeyGeneration(format!("CreateAlias failed: {}", DisplayErrorContext(&e))))?;

    let public_key = client
        .get_public_key()
        .key_id(&key_id)
        .send()
        .await
        .map_err(|e| SdkError::KeyGeneration(format!("GetPublicKey failed: {}", DisplayErrorContext(&e))))?;

    let public_key_der = public_key
        .public_key()
        .map(|blob| blob.as_ref().to_vec())
        .ok_or_else(|| SdkError::KeyGeneration("GetPublicKey returned no key".to_string()))?;

    Ok(KmsKeyPair {
        key_id,
        alias: alias.to_string(),
        public_key_pem: spki_der_to_pem(&public_key_der)?,
        public_key_hex: hex::encode(&public_key_der),
        public_key_der,
    })
}

/// Re-encode a SubjectPublicKeyInfo DER key as PEM.
pub fn spki_der_to_pem(der: &[u8]) -> Result<String, SdkError> {
    let key = PublicKey::from_public_key_der(der)
        .map_err(|e| SdkError::KeyGeneration(format!("Invalid public key: {e}")))?;
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| SdkError::KeyGeneration(format!("SPKI PEM encoding failed: {e}")))
}
