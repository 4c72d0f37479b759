//! Line parser and intensity decoder for the rain feed.

use anyhow::{Result, anyhow};
use std::collections::HashMap;

/// Decodes one raw feed value into a rain rate in mm/hour.
///
/// The transform is fixed by the feed's documented contract:
/// `10^((value - 109) / 32)`, rounded to one decimal. The `+0.01` nudge
/// keeps `.x5` results from rounding down.
pub fn decode_rate(value: i64) -> f64 {
    let intensity = 10f64.powf((value as f64 - 109.0) / 32.0);
    ((intensity + 0.01) * 10.0).round() / 10.0
}

/// Parses a feed response body into a lookup from `"HH:MM"` label to decoded
/// rain rate.
///
/// The body is newline-separated `value|HH:MM` lines with one trailing
/// newline, which is stripped before splitting. A repeated label keeps the
/// later line's value; line order carries no meaning.
///
/// # Errors
///
/// Returns an error for any line without a `|` separator or with a
/// non-integer value. A structurally broken response is an upstream contract
/// violation, so it fails the whole poll cycle rather than being skipped.
pub fn parse_feed(text: &str) -> Result<HashMap<String, f64>> {
    let body = text.strip_suffix('\n').unwrap_or(text);

    let mut lookup = HashMap::new();
    if body.is_empty() {
        return Ok(lookup);
    }

    for line in body.split('\n') {
        let (value, label) = line
            .split_once('|')
            .ok_or_else(|| anyhow!("feed line missing '|' separator: {line:?}"))?;
        let value: i64 = value
            .parse()
            .map_err(|e| anyhow!("feed line has non-integer value {value:?}: {e}"))?;
        lookup.insert(label.to_string(), decode_rate(value));
    }

    Ok(lookup)
}
