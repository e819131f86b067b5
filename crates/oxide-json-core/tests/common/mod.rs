#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use oxide_json_core::{codec, JsonValue};

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, micro: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_micro_opt(h, min, s, micro))
        .unwrap_or_else(|| panic!("invalid test timestamp {y}-{m}-{d}"))
}

/// Encodes then decodes, panicking with the payload on failure.
pub fn round_trip(value: &JsonValue) -> JsonValue {
    let text = codec::encode(value).unwrap_or_else(|e| panic!("encode failed: {e}"));
    codec::decode(&text).unwrap_or_else(|e| panic!("decode failed for {text}: {e}"))
}
