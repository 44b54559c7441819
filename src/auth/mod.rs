// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Outgoing requests and incoming webhooks are both authenticated here.
//!
//! ## Request Auth Flow
//!
//! 1. The client hashes the request body and builds [`RequestClaims`]
//!    (`urlPath`, `userId`, `iat`, `exp`, `body`)
//! 2. [`AuthTokenService`] signs `header.payload` with the active signer
//! 3. The token is sent as `Authorization: Bearer <token>` next to the
//!    `Api-Key` header
//! 4. The server recomputes the digest and checks the signature against the
//!    public key registered for the API user
//!
//! ## Webhooks
//!
//! [`validate_webhook_signature`] checks the HMAC attached to deliveries.

pub mod claims;
pub mod token;
pub mod webhook;

pub use claims::RequestClaims;
pub use token::{body_digest, verify_auth_token, AuthTokenService};
pub use webhook::{sign_webhook, validate_webhook_signature};
