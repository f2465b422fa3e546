//! Encoded polyline codec
//!
//! The compact coordinate format used by routing APIs: each coordinate is
//! stored as a signed delta from the previous one, scaled by 1e5 and
//! written as 5-bit groups offset into printable ASCII.
//!
//! Decoding never fails loudly. Empty or malformed input yields an empty
//! path, which callers treat as "no path available".

use crate::value_objects::Coordinate;

const PRECISION: f64 = 1e5;
const CHAR_OFFSET: i64 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const VALUE_MASK: i64 = 0x1f;
/// More groups than this cannot belong to a valid coordinate delta
const MAX_SHIFT: u32 = 60;

/// Decode an encoded polyline into coordinates
///
/// Returns an empty vector for empty or malformed input.
#[must_use]
pub fn decode(encoded: &str) -> Vec<Coordinate> {
    decode_strict(encoded.as_bytes()).unwrap_or_default()
}

fn decode_strict(bytes: &[u8]) -> Option<Vec<Coordinate>> {
    let mut path = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat = lat.wrapping_add(next_delta(bytes, &mut index)?);
        lng = lng.wrapping_add(next_delta(bytes, &mut index)?);

        #[allow(clippy::cast_precision_loss)]
        path.push(Coordinate::new_unchecked(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Some(path)
}

/// Read one signed delta, advancing `index` past its terminator group
fn next_delta(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = *bytes.get(*index)?;
        *index += 1;

        let group = i64::from(byte) - CHAR_OFFSET;
        if !(0..64).contains(&group) {
            return None;
        }

        result |= (group & VALUE_MASK) << shift;
        shift += 5;

        if group < CONTINUATION_BIT {
            break;
        }
        if shift > MAX_SHIFT {
            return None;
        }
    }

    Some(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode coordinates into the compact polyline format
#[must_use]
pub fn encode(path: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for coordinate in path {
        let lat = scale(coordinate.latitude());
        let lng = scale(coordinate.longitude());
        push_delta(&mut out, lat - prev_lat);
        push_delta(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

#[allow(clippy::cast_possible_truncation)]
fn scale(value: f64) -> i64 {
    (value * PRECISION).round() as i64
}

fn push_delta(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION_BIT {
        push_group(out, (CONTINUATION_BIT | (value & VALUE_MASK)) + CHAR_OFFSET);
        value >>= 5;
    }
    push_group(out, value + CHAR_OFFSET);
}

fn push_group(out: &mut String, code: i64) {
    // Groups are always within 63..=126
    if let Some(c) = u32::try_from(code).ok().and_then(char::from_u32) {
        out.push(c);
    }
}
