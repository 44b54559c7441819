// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contact (address book) endpoints.
//!
//! A new contact starts `PENDING` until approved by the organization's
//! approvers.

use serde_json::json;

use super::list_path;
use crate::{
    client::ApiClient,
    error::SdkError,
    models::{Contact, ContactListResponse, CreateContactRequest},
};

const CONTACTS_PATH: &str = "/api/external/contacts/";

impl ApiClient {
    /// One page of contacts. `filters` are appended to the query verbatim.
    pub async fn get_contacts(
        &self,
        filters: &[(&str, &str)],
        page: u32,
        limit: u32,
    ) -> Result<ContactListResponse, SdkError> {
        let path = list_path(
            CONTACTS_PATH,
            &[("limit", limit.to_string()), ("page", page.to_string())],
            filters,
        );
        self.get_as(&path).await
    }

    pub async fn get_contact_by_id(&self, contact_id: &str) -> Result<Contact, SdkError> {
        self.get_as(&format!("{CONTACTS_PATH}{contact_id}/")).await
    }

    pub async fn create_contact(&self, request: &CreateContactRequest) -> Result<Contact, SdkError> {
        let body = json!({
            "name": request.name,
            "address": request.address,
            "blockChain": request.chain,
            "tags": request.tags,
            "externalId": request.external_id,
        });
        self.post_as(CONTACTS_PATH, body).await
    }
}
