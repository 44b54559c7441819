// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoint wrappers over [`ApiClient`](crate::client::ApiClient).
//!
//! Each module adds an `impl ApiClient` block for one resource. Wrappers fix
//! the method, path and body shape and decode the response; they add no
//! retry or polling of their own.
//!
//! | Module | Base path |
//! |--------|-----------|
//! | [`assets`] | `/api/external/assets/` |
//! | [`vaults`] | `/api/external/vaults/` |
//! | [`transactions`] | `/api/external/transactions/` |
//! | [`contacts`] | `/api/external/contacts/` |
//! | [`operations`] | `/api/external/operations/` |

pub mod assets;
pub mod contacts;
pub mod operations;
pub mod transactions;
pub mod vaults;

/// Default page size of list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Build a list path with its query string embedded.
///
/// `leading` pairs come first in the given order, then caller filters.
/// Values are inserted verbatim, since the server verifies the token against
/// the exact path it receives. The string always ends in `&` when there are
/// no filters.
pub(crate) fn list_path(base: &str, leading: &[(&str, String)], filters: &[(&str, &str)]) -> String {
    let leading = leading
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let filters = filters
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{leading}&{filters}")
}

/// Query-string rendering of a boolean flag.
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
