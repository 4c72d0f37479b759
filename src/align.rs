//! Alignment of raw feed samples onto a canonical prediction window.
//!
//! The feed keys its samples by bare `"HH:MM"` labels with no date component
//! and no ordering guarantee. Alignment builds the 24 expected labels for a
//! poll instant and looks each one up, so early, missing, and out-of-order
//! samples all fall out of a plain map lookup.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::HashMap;

/// Number of prediction slots in one feed response.
pub const SLOT_COUNT: usize = 24;

/// Spacing between consecutive slots, in minutes.
pub const SLOT_SPACING_MIN: u32 = 5;

/// The 24 expected prediction instants for one poll cycle.
#[derive(Debug, Clone)]
pub struct PredictionWindow {
    /// First slot: the poll instant rounded up to the next 5-minute boundary.
    pub anchor: NaiveDateTime,
    pub slots: Vec<NaiveDateTime>,
}

impl PredictionWindow {
    /// Builds the window whose first slot is the next 5-minute boundary
    /// strictly after `now`, seconds zeroed.
    pub fn starting_after(now: NaiveDateTime) -> Self {
        let next_minute = SLOT_SPACING_MIN * (now.minute() / SLOT_SPACING_MIN + 1);
        let anchor = if next_minute < 60 {
            now.date()
                .and_hms_opt(now.hour(), next_minute, 0)
                .expect("minute below 60")
        } else {
            // next_minute is exactly 60 here: zero the minute and add a whole
            // hour, leaving day and month rollover to the date arithmetic.
            now.date()
                .and_hms_opt(now.hour(), 0, 0)
                .expect("whole hour")
                + Duration::minutes(60)
        };

        let slots = (0..SLOT_COUNT as i64)
            .map(|i| anchor + Duration::minutes(i * SLOT_SPACING_MIN as i64))
            .collect();

        Self { anchor, slots }
    }

    /// Slot labels in the feed's key format: zero-padded 24-hour `"HH:MM"`,
    /// no date, no seconds.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.slots
            .iter()
            .map(|slot| slot.format("%H:%M").to_string())
    }
}

/// One fixed-width output row: the window anchor plus 24 rates in mm/hour,
/// `None` where the feed had no sample for a slot.
///
/// Built fresh each poll cycle, appended to the table, then dropped.
#[derive(Debug, Serialize)]
pub struct PredictionRow {
    pub timestamp: NaiveDateTime,
    pub rates: Vec<Option<f64>>,
}

impl PredictionRow {
    /// Looks up every slot of `window` in `lookup`.
    ///
    /// Feed lines earlier than every slot are never looked up; slots with no
    /// matching line come out as `None`; line order never matters because
    /// the match is by label.
    pub fn from_lookup(window: &PredictionWindow, lookup: &HashMap<String, f64>) -> Self {
        let rates = window
            .labels()
            .map(|label| lookup.get(&label).copied())
            .collect();

        Self {
            timestamp: window.anchor,
            rates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_anchor_rounds_up_to_next_boundary() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 14, 0));
        assert_eq!(window.anchor, instant(2024, 12, 2, 22, 15, 0));
    }

    #[test]
    fn test_anchor_is_strictly_after_an_exact_boundary() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 15, 0));
        assert_eq!(window.anchor, instant(2024, 12, 2, 22, 20, 0));
    }

    #[test]
    fn test_anchor_zeroes_seconds() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 13, 47));
        assert_eq!(window.anchor, instant(2024, 12, 2, 22, 15, 0));
    }

    #[test]
    fn test_anchor_rolls_over_the_hour() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 58, 30));
        assert_eq!(window.anchor, instant(2024, 12, 2, 23, 0, 0));
    }

    #[test]
    fn test_anchor_rolls_over_the_day() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 23, 57, 0));
        assert_eq!(window.anchor, instant(2024, 12, 3, 0, 0, 0));
    }

    #[test]
    fn test_anchor_rolls_over_the_year() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 31, 23, 59, 59));
        assert_eq!(window.anchor, instant(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_slots_are_spaced_five_minutes() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 14, 0));
        assert_eq!(window.slots.len(), SLOT_COUNT);
        assert_eq!(window.slots[0], window.anchor);
        for pair in window.slots.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(5));
        }
    }

    #[test]
    fn test_labels_wrap_past_midnight() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 23, 14, 0));
        let labels: Vec<String> = window.labels().collect();
        assert_eq!(labels[0], "23:15");
        assert_eq!(labels[8], "23:55");
        assert_eq!(labels[9], "00:00");
        assert_eq!(labels[23], "01:10");
    }

    #[test]
    fn test_row_takes_matching_labels_and_pads_the_rest() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 14, 0));
        let mut lookup = HashMap::new();
        lookup.insert("22:15".to_string(), 0.3);
        lookup.insert("22:20".to_string(), 1.2);
        // A label earlier than every slot; never looked up.
        lookup.insert("22:10".to_string(), 9.9);

        let row = PredictionRow::from_lookup(&window, &lookup);

        assert_eq!(row.timestamp, window.anchor);
        assert_eq!(row.rates[0], Some(0.3));
        assert_eq!(row.rates[1], Some(1.2));
        assert!(row.rates[2..].iter().all(Option::is_none));
    }

    #[test]
    fn test_row_is_all_sentinels_when_nothing_matches() {
        let window = PredictionWindow::starting_after(instant(2024, 12, 2, 22, 14, 0));
        let row = PredictionRow::from_lookup(&window, &HashMap::new());

        assert_eq!(row.rates.len(), SLOT_COUNT);
        assert!(row.rates.iter().all(Option::is_none));
    }
}
