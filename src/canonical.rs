// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical JSON serialization for signed payloads.
//!
//! The server recomputes every signature from the JSON it receives, so the
//! exact bytes matter. Object keys are always sorted by code point. The
//! [`JsonStyle`] picks separators and whether non-ASCII text is escaped as
//! `\uXXXX`.
//!
//! Numbers are written the way the server's JSON encoder writes them:
//! integers exactly as received, floats in shortest round-trip form with a
//! `.0` on integral values and a signed two-digit exponent outside
//! `1e-4 <= |x| < 1e16` (`1e-07`, `1e+16`).

use std::io;

use serde::Serialize;
use serde_json::{ser::Formatter, Map, Value};

/// Separator and escaping rules for a canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStyle {
    pub item_separator: &'static str,
    pub key_separator: &'static str,
    pub ensure_ascii: bool,
}

impl JsonStyle {
    /// `{"a":1,"b":"é"}`: body signatures.
    pub const COMPACT: JsonStyle = JsonStyle {
        item_separator: ",",
        key_separator: ":",
        ensure_ascii: false,
    };

    /// `{"a":1,"b":"\u00e9"}`: token segments and webhook messages.
    pub const COMPACT_ASCII: JsonStyle = JsonStyle {
        item_separator: ",",
        key_separator: ":",
        ensure_ascii: true,
    };

    /// `{"a": 1, "b": "\u00e9"}`: the body digest inside the auth token.
    pub const SPACED_ASCII: JsonStyle = JsonStyle {
        item_separator: ", ",
        key_separator: ": ",
        ensure_ascii: true,
    };
}

/// Serialize `value` with sorted keys in the given style.
pub fn to_canonical_string(value: &Value, style: JsonStyle) -> Result<String, serde_json::Error> {
    let sorted = sort_keys(value);
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, StyledFormatter { style });
    sorted.serialize(&mut serializer)?;
    // The formatter only ever writes UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Compact, sorted, non-ASCII preserved.
pub fn compact(value: &Value) -> Result<String, serde_json::Error> {
    to_canonical_string(value, JsonStyle::COMPACT)
}

// Rebuilt explicitly so ordering holds even with serde_json's `preserve_order`.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

struct StyledFormatter {
    style: JsonStyle,
}

impl Formatter for StyledFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(self.style.item_separator.as_bytes())
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(self.style.item_separator.as_bytes())
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(self.style.key_separator.as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.style.ensure_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            // DEL is escaped too in ASCII mode.
            if (ch as u32) < 0x7f {
                let mut buf = [0u8; 1];
                writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(format_float(value).as_bytes())
    }

    // Every number passes through here with `arbitrary_precision`.
    fn write_number_str<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(format_number(value).as_bytes())
    }
}

/// Normalize a JSON number literal.
fn format_number(literal: &str) -> String {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    let is_integer = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    if is_integer {
        return if digits.bytes().all(|b| b == b'0') {
            "0".to_string()
        } else {
            literal.to_string()
        };
    }
    match literal.parse::<f64>() {
        Ok(value) => format_float(value),
        Err(_) => literal.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value == 0.0 {
        return format!("{sign}0.0");
    }

    // Shortest round-trip digits, e.g. "1.5e-5".
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        if exponent < 0 {
            let zeros = "0".repeat((-exponent - 1) as usize);
            return format!("{sign}0.{zeros}{digits}");
        }
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            let zeros = "0".repeat(int_len - digits.len());
            format!("{sign}{digits}{zeros}.0")
        } else {
            format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
        }
    } else {
        let (lead, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            lead.to_string()
        } else {
            format!("{lead}.{rest}")
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.abs())
    }
}
