// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verification of incoming webhook deliveries.
//!
//! Each delivery carries `X-Signature` (hex HMAC-SHA256) and `X-Timestamp`
//! (Unix seconds). The signed message is the body re-serialized as compact,
//! key-sorted, ASCII-escaped JSON (or the raw body when it is not JSON)
//! followed by the decimal timestamp.
//!
//! The sender writes the HMAC as lowercase hex, and only that exact string is
//! accepted. Uppercase or mixed-case hex is rejected even when it decodes to
//! the right bytes.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{to_canonical_string, JsonStyle};

pub const SIGNATURE_HEADER: &str = "X-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

type HmacSha256 = Hmac<Sha256>;

/// Validate the signature of a webhook delivery.
///
/// `headers` is any iterable of name/value pairs; names match
/// case-insensitively. Returns `false` for missing headers, malformed
/// values, or a signature mismatch.
pub fn validate_webhook_signature<'a, I>(headers: I, body: &str, verification_key: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut signature = None;
    let mut timestamp = None;
    for (name, value) in headers {
        if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
            signature = Some(value.trim());
        } else if name.eq_ignore_ascii_case(TIMESTAMP_HEADER) {
            timestamp = Some(value.trim());
        }
    }

    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        debug!("webhook rejected: signature or timestamp header missing");
        return false;
    };
    if signature.is_empty() {
        return false;
    }
    let Ok(timestamp) = timestamp.parse::<i64>() else {
        debug!("webhook rejected: timestamp is not an integer");
        return false;
    };
    // Format check on the public value; the byte compare below is constant time.
    if !is_lowercase_hex(signature) {
        debug!("webhook rejected: signature is not lowercase hex");
        return false;
    }
    let Ok(received) = hex::decode(signature) else {
        return false;
    };

    let message = webhook_message(body, timestamp);
    let Ok(mut mac) = HmacSha256::new_from_slice(verification_key.as_bytes()) else {
        return false;
    };
    mac.update(message.as_bytes());
    mac.verify_slice(&received).is_ok()
}

/// Compute the hex signature a sender would attach to `body` at `timestamp`.
pub fn sign_webhook(body: &str, timestamp: i64, verification_key: &str) -> String {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(verification_key.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC keys have no length limit"));
    mac.update(webhook_message(body, timestamp).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn is_lowercase_hex(value: &str) -> bool {
    value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn webhook_message(body: &str, timestamp: i64) -> String {
    let canonical = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| to_canonical_string(&value, JsonStyle::COMPACT_ASCII).ok());
    match canonical {
        Some(json) => format!("{json}{timestamp}"),
        None => format!("{body}{timestamp}"),
    }
}
