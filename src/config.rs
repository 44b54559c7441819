// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Configuration
//!
//! [`ClientConfig`] is an explicit value passed to the client constructor.
//! It is built once at startup, either in code or from the environment, and
//! read on every signed request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SIGNATURE_SERVICE` | Active signer (`PRIVATE_KEY` or `AWS_KMS`) | `PRIVATE_KEY` |
//! | `AWS_REGION` | Region of the KMS key | `eu-north-1` |
//! | `KMS_SIGNING_ALGORITHM` | KMS signing algorithm | `ECDSA_SHA_256` |
//! | `EXPIRES_IN` | Auth token lifetime in seconds | `300` |
//! | `REQUEST_TIMEOUT_SECS` | HTTP request timeout in seconds | `20` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// Environment variable selecting the signature service.
pub const SIGNATURE_SERVICE_ENV: &str = "SIGNATURE_SERVICE";

/// Environment variable holding the AWS region used for KMS calls.
pub const AWS_REGION_ENV: &str = "AWS_REGION";

/// Environment variable overriding the KMS signing algorithm.
pub const KMS_SIGNING_ALGORITHM_ENV: &str = "KMS_SIGNING_ALGORITHM";

/// Environment variable for the auth token lifetime (seconds).
pub const EXPIRES_IN_ENV: &str = "EXPIRES_IN";

/// Environment variable for the HTTP request timeout (seconds).
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_AWS_REGION: &str = "eu-north-1";
pub const DEFAULT_KMS_SIGNING_ALGORITHM: &str = "ECDSA_SHA_256";
pub const DEFAULT_TOKEN_EXPIRES_IN: Duration = Duration::from_secs(300);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Largest accepted value for the seconds variables. Token expiry is an
/// `i64` timestamp, so a lifetime has to fit one.
pub const MAX_SECONDS: u64 = i64::MAX as u64;

/// Which signer produces request signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureService {
    /// A P-256 private key held by the caller.
    #[default]
    PrivateKey,
    /// A P-256 key held inside AWS KMS, referenced by key id.
    AwsKms,
}

impl SignatureService {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureService::PrivateKey => "PRIVATE_KEY",
            SignatureService::AwsKms => "AWS_KMS",
        }
    }
}

impl fmt::Display for SignatureService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureService {
    type Err = SdkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PRIVATE_KEY" => Ok(SignatureService::PrivateKey),
            "AWS_KMS" => Ok(SignatureService::AwsKms),
            other => Err(SdkError::Configuration(format!(
                "unknown signature service '{other}' (expected PRIVATE_KEY or AWS_KMS)"
            ))),
        }
    }
}

/// Settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub signature_service: SignatureService,
    pub aws_region: String,
    pub kms_signing_algorithm: String,
    pub token_expires_in: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signature_service: SignatureService::default(),
            aws_region: DEFAULT_AWS_REGION.to_string(),
            kms_signing_algorithm: DEFAULT_KMS_SIGNING_ALGORITHM.to_string(),
            token_expires_in: DEFAULT_TOKEN_EXPIRES_IN,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Configuration for local private-key signing with default settings.
    pub fn private_key() -> Self {
        Self::default()
    }

    /// Configuration for AWS KMS signing in the given region.
    pub fn aws_kms(region: impl Into<String>) -> Self {
        Self {
            signature_service: SignatureService::AwsKms,
            aws_region: region.into(),
            ..Self::default()
        }
    }

    pub fn with_signature_service(mut self, service: SignatureService) -> Self {
        self.signature_service = service;
        self
    }

    pub fn with_token_expires_in(mut self, expires_in: Duration) -> Self {
        self.token_expires_in = expires_in;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_lookup(env_optional)
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Missing or blank values fall back to defaults; present values must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let signature_service = match lookup(SIGNATURE_SERVICE_ENV) {
            Some(value) => value.parse()?,
            None => defaults.signature_service,
        };

        Ok(Self {
            signature_service,
            aws_region: lookup(AWS_REGION_ENV).unwrap_or(defaults.aws_region),
            kms_signing_algorithm: lookup(KMS_SIGNING_ALGORITHM_ENV)
                .unwrap_or(defaults.kms_signing_algorithm),
            token_expires_in: seconds_var(&lookup, EXPIRES_IN_ENV)?
                .unwrap_or(defaults.token_expires_in),
            request_timeout: seconds_var(&lookup, REQUEST_TIMEOUT_ENV)?
                .unwrap_or(defaults.request_timeout),
        })
    }
}

fn seconds_var<F>(lookup: &F, name: &str) -> Result<Option<Duration>, SdkError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let secs = raw
        .parse::<u64>()
        .map_err(|e| SdkError::Configuration(format!("{name} must be a number of seconds: {e}")))?;
    if !(1..=MAX_SECONDS).contains(&secs) {
        return Err(SdkError::Configuration(format!(
            "{name} must be between 1 and {MAX_SECONDS} seconds, got {secs}"
        )));
    }
    Ok(Some(Duration::from_secs(secs)))
}

/// Read an environment variable, treating blank values as unset.
pub(crate) fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
