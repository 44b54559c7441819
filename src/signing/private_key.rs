// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local P-256 signing.
//!
//! Keys are accepted as PKCS#8 PEM (`PRIVATE KEY`), SEC1 PEM
//! (`EC PRIVATE KEY`), or hex-encoded PKCS#8 DER as printed by the key
//! generator.

use async_trait::async_trait;
use p256::{
    ecdsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey},
    SecretKey,
};

use super::{RequestSigner, SigningError};
use crate::config::SignatureService;

/// Signs requests with a P-256 key held in memory.
#[derive(Clone)]
pub struct PrivateKeySigner {
    signing_key: SigningKey,
}

impl PrivateKeySigner {
    pub fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// Parse a private key from PEM text or hex-encoded DER.
    pub fn from_bytes(key: &[u8]) -> Result<Self, SigningError> {
        let text = std::str::from_utf8(key)
            .map_err(|e| SigningError::InvalidPrivateKey(format!("Invalid UTF-8: {e}")))?
            .trim();

        if text.starts_with("-----BEGIN") {
            Self::from_pem(text)
        } else {
            Self::from_der_hex(text)
        }
    }

    /// Parse a PEM-encoded private key (PKCS#8 or SEC1).
    pub fn from_pem(pem_str: &str) -> Result<Self, SigningError> {
        // Keys pasted through env vars often carry literal "\n".
        let normalized = pem_str.replace("\\n", "\n");
        let pem = pem::parse(normalized.trim())
            .map_err(|e| SigningError::InvalidPrivateKey(format!("Invalid PEM: {e}")))?;

        let signing_key = match pem.tag() {
            "EC PRIVATE KEY" => SecretKey::from_sec1_der(pem.contents())
                .map(SigningKey::from)
                .map_err(|e| e.to_string()),
            _ => parse_pkcs8(pem.contents()).or_else(|_| {
                SecretKey::from_sec1_der(pem.contents())
                    .map(SigningKey::from)
                    .map_err(|e| e.to_string())
            }),
        }
        .map_err(|e| SigningError::InvalidPrivateKey(format!("Invalid key format: {e}")))?;

        Ok(Self { signing_key })
    }

    /// Parse a hex-encoded PKCS#8 DER private key.
    pub fn from_der_hex(der_hex: &str) -> Result<Self, SigningError> {
        let der = hex::decode(der_hex.trim().trim_start_matches("0x"))
            .map_err(|e| SigningError::InvalidPrivateKey(format!("Invalid hex: {e}")))?;
        let signing_key = parse_pkcs8(&der)
            .map_err(|e| SigningError::InvalidPrivateKey(format!("Invalid key format: {e}")))?;
        Ok(Self { signing_key })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// SubjectPublicKeyInfo DER of the matching public key.
    pub fn public_key_der(&self) -> Result<Vec<u8>, SigningError> {
        self.verifying_key()
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| SigningError::InvalidPublicKey(e.to_string()))
    }

    /// Synchronous signing; returns a DER-encoded signature.
    pub fn sign_der(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| SigningError::Crypto(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

#[async_trait]
impl RequestSigner for PrivateKeySigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        self.sign_der(message)
    }

    fn service(&self) -> SignatureService {
        SignatureService::PrivateKey
    }
}

fn parse_pkcs8(der: &[u8]) -> Result<SigningKey, String> {
    SigningKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Verify a DER ECDSA-P256-SHA256 signature against a SPKI DER public key.
pub fn verify_signature(
    public_key_der: &[u8],
    message: &[u8],
    signature_der: &[u8],
) -> Result<(), SigningError> {
    let verifying_key = VerifyingKey::from_public_key_der(public_key_der)
        .map_err(|e| SigningError::InvalidPublicKey(e.to_string()))?;
    let signature = Signature::from_der(signature_der)
        .map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
    verifying_key
        .verify(message, &signature)
        .map_err(|e| SigningError::InvalidSignature(e.to_string()))
}
