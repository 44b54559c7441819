// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PrimeVault SDK - Signed client for the PrimeVault custody API
//!
//! Every request is authenticated with an ES256 bearer token bound to its
//! path and body. Tokens and body signatures come from a P-256 key held
//! either locally or in AWS KMS.
//!
//! ```no_run
//! use primevault_sdk::{ApiClient, ClientConfig, SigningCredentials};
//!
//! # async fn run() -> Result<(), primevault_sdk::SdkError> {
//! let pem = std::fs::read("private_key.pem").unwrap_or_default();
//! let client = ApiClient::new(
//!     ClientConfig::from_env()?,
//!     "api-key",
//!     "https://app.primevault.com",
//!     SigningCredentials::private_key(pem),
//! )
//! .await?;
//! let vaults = client.get_vaults(&[], 1, 20, false).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `api` - Endpoint wrappers (assets, vaults, transactions, contacts, operations)
//! - `auth` - Bearer tokens and webhook verification
//! - `canonical` - Sorted-key JSON serialization used for signing
//! - `client` - Signed HTTP client
//! - `keys` - Local and KMS key pair generation
//! - `logging` - Tracing subscriber setup
//! - `models` - Request and response types
//! - `signing` - Local and KMS signers

pub mod api;
pub mod auth;
pub mod canonical;
pub mod client;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod models;
pub mod signing;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{validate_webhook_signature, AuthTokenService};
pub use client::ApiClient;
pub use config::{ClientConfig, SignatureService};
pub use error::{ApiError, ApiErrorKind, SdkError};
pub use keys::{generate_aws_kms_key_pair, generate_aws_kms_key_pair_with_client, generate_public_private_key_pair};
pub use signing::{KmsSigner, PrivateKeySigner, RequestSigner, SigningCredentials, SigningError};
