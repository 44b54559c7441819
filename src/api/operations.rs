// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Approval operations.
//!
//! An API user registered as an approver fetches the message for a pending
//! operation, signs it, and submits the decision.

use serde_json::{json, Value};

use crate::{client::ApiClient, error::SdkError};

const OPERATIONS_PATH: &str = "/api/external/operations/";

impl ApiClient {
    pub async fn get_operation_message_to_sign(&self, operation_id: &str) -> Result<Value, SdkError> {
        self.get(
            &format!("{OPERATIONS_PATH}{operation_id}/operation_message_to_sign/"),
            None,
        )
        .await
    }

    /// Approve or reject an operation with a signature over its message.
    pub async fn update_user_action(
        &self,
        operation_id: &str,
        is_approved: bool,
        signature_hex: &str,
    ) -> Result<Value, SdkError> {
        let body = json!({
            "isApproved": is_approved,
            "signatureHex": signature_hex,
            "operationId": operation_id,
        });
        self.post(
            &format!("{OPERATIONS_PATH}{operation_id}/update_user_action/"),
            Some(body),
        )
        .await
    }
}
