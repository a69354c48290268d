//! State codec — `DrawState` <-> URL-safe token.
//!
//! DESIGN
//! ======
//! Two wire grammars are accepted:
//!
//! - compact: `m<mask>[.t<secs>]`, both numbers in lowercase base 36. This is
//!   what [`StateCodec::encode`] produces.
//! - legacy: URL-safe Base64 (padding stripped) of a JSON document listing the
//!   remaining items by id and label.
//!
//! [`classify`] resolves a raw string into a [`Token`] by trying the legacy
//! shape first and the compact shape second. Decoding is total: anything that
//! matches neither grammar is `None`, and corrupt mask digits decode to an
//! exhausted state instead of an error.
//!
//! TRADE-OFFS
//! ==========
//! The compact grammar stores creation time in whole seconds, so `created_at`
//! only survives a round trip to one-second precision.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::pool::Pool;
use crate::state::DrawState;

/// Radix used for both numbers in the compact grammar.
pub const COMPACT_RADIX: u32 = 36;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A raw token resolved to one of the two grammars.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Compact(CompactToken),
    Legacy(LegacyPayload),
}

/// Digits captured from `m<mask>[.t<time>]`, lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactToken {
    pub mask_digits: String,
    pub time_digits: Option<String>,
}

/// JSON document carried by legacy tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub items: Vec<LegacyItem>,
    #[serde(default)]
    pub meta: LegacyMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyMeta {
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<serde_json::Number>,
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Resolve a raw token into its grammar, legacy shape first.
#[must_use]
pub fn classify(raw: &str) -> Option<Token> {
    if let Some(payload) = parse_legacy(raw) {
        return Some(Token::Legacy(payload));
    }
    match parse_compact(raw) {
        Some(compact) => Some(Token::Compact(compact)),
        None => {
            debug!(len = raw.len(), "token matches neither grammar");
            None
        }
    }
}

fn parse_legacy(raw: &str) -> Option<LegacyPayload> {
    if raw.is_empty() || raw.len() % 4 == 1 {
        return None;
    }

    let mut standard: String = raw
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let padding = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat_n('=', padding));

    let bytes = match STANDARD.decode(standard.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "token is not base64; trying compact grammar");
            return None;
        }
    };
    let Ok(text) = String::from_utf8(bytes) else {
        debug!("base64 token is not utf-8; trying compact grammar");
        return None;
    };
    match serde_json::from_str::<LegacyPayload>(&text) {
        Ok(payload) => Some(payload),
        Err(e) => {
            debug!(error = %e, "base64 token is not a legacy payload; trying compact grammar");
            None
        }
    }
}

fn parse_compact(raw: &str) -> Option<CompactToken> {
    let lowered = raw.to_ascii_lowercase();
    let body = lowered.strip_prefix('m')?;
    let (mask, time) = match body.split_once(".t") {
        Some((mask, time)) => (mask, Some(time)),
        None => (body, None),
    };

    if !is_radix36(mask) || time.is_some_and(|digits| !is_radix36(digits)) {
        return None;
    }

    Some(CompactToken {
        mask_digits: mask.to_owned(),
        time_digits: time.map(str::to_owned),
    })
}

fn is_radix36(digits: &str) -> bool {
    !digits.is_empty()
        && digits
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

/// Render `value` in lowercase base 36 with no sign or leading zeros.
#[must_use]
pub fn to_radix36(mut value: u64) -> String {
    let mut buf = Vec::with_capacity(13);
    loop {
        // value % 36 < 36, so the index is always in bounds.
        buf.push(DIGITS[(value % u64::from(COMPACT_RADIX)) as usize]);
        value /= u64::from(COMPACT_RADIX);
        if value == 0 {
            break;
        }
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

// =============================================================================
// CODEC
// =============================================================================

/// Bidirectional token codec bound to one pool.
#[derive(Debug, Clone)]
pub struct StateCodec {
    pool: Arc<Pool>,
}

impl StateCodec {
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Encode a state in the compact grammar.
    ///
    /// Bits at or above the pool size are cleared before rendering, so an
    /// out-of-range mask encodes as its in-range part.
    #[must_use]
    pub fn encode(&self, state: &DrawState) -> String {
        let mask = state.remaining & self.pool.full_mask();
        let mut token = format!("m{}", to_radix36(u64::from(mask)));
        if let Some(created_at) = state.created_at {
            token.push_str(".t");
            token.push_str(&to_radix36(created_at / 1000));
        }
        token
    }

    /// Encode a state in the legacy grammar.
    ///
    /// Returns an empty string if the payload cannot be serialized; callers
    /// treat that as "no link to publish".
    #[must_use]
    pub fn encode_legacy(&self, state: &DrawState) -> String {
        let payload = LegacyPayload {
            id: Some(Uuid::new_v4().to_string()),
            items: self
                .pool
                .items_in(state.remaining)
                .map(|(_, item)| LegacyItem {
                    id: item.id.clone(),
                    label: item.label.clone(),
                })
                .collect(),
            meta: LegacyMeta {
                created_at: state.created_at.map(serde_json::Number::from),
            },
        };

        match serde_json::to_vec(&payload) {
            Ok(json) => URL_SAFE_NO_PAD.encode(json),
            Err(e) => {
                warn!(error = %e, "legacy payload serialization failed");
                String::new()
            }
        }
    }

    /// Decode a token in either grammar. `None` means the token is unrecognized.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<DrawState> {
        let state = match classify(token)? {
            Token::Legacy(payload) => self.state_from_legacy(&payload),
            Token::Compact(compact) => self.state_from_compact(&compact),
        };
        Some(state)
    }

    fn state_from_legacy(&self, payload: &LegacyPayload) -> DrawState {
        let mut remaining = 0_u32;
        for item in &payload.items {
            let index = self
                .pool
                .index_of(&item.label)
                .or_else(|| self.pool.index_of(&item.id));
            match index {
                Some(index) => remaining |= 1_u32 << index,
                None => debug!(id = %item.id, label = %item.label, "legacy item not in pool"),
            }
        }

        DrawState {
            remaining,
            created_at: payload.meta.created_at.as_ref().and_then(number_to_millis),
        }
    }

    fn state_from_compact(&self, compact: &CompactToken) -> DrawState {
        let remaining = match u32::from_str_radix(&compact.mask_digits, COMPACT_RADIX) {
            Ok(mask) if mask & !self.pool.full_mask() == 0 => mask,
            Ok(mask) => {
                debug!(mask, "compact mask has bits beyond the pool; treating as exhausted");
                0
            }
            Err(e) => {
                debug!(error = %e, "compact mask unparseable; treating as exhausted");
                0
            }
        };

        let created_at = compact.time_digits.as_deref().and_then(|digits| {
            match u64::from_str_radix(digits, COMPACT_RADIX) {
                Ok(secs) => secs.checked_mul(1000),
                Err(_) => None,
            }
        });

        DrawState {
            remaining,
            created_at,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn number_to_millis(number: &serde_json::Number) -> Option<u64> {
    if let Some(ms) = number.as_u64() {
        return Some(ms);
    }
    // Negative or fractional timestamps from older clients; floor what we can.
    let ms = number.as_f64()?;
    (ms.is_finite() && ms >= 0.0 && ms < u64::MAX as f64).then(|| ms.floor() as u64)
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
