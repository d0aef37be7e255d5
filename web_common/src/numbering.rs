//! Channel number edits and insert-at shift planning.

use std::fmt;

use crate::models::ChannelRow;

/// What to do with an inline number edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberEdit {
    /// Blank or unchanged input; restore the old value, no request.
    Unchanged,
    /// Not an integer; restore the old value, no request.
    Invalid,
    /// Send the change to the server.
    Commit { old: String, new: String },
}

/// Decide what an inline edit means, given the captured old value.
pub fn evaluate_number_edit(old: &str, input: &str) -> NumberEdit {
    let new = input.trim();
    if new.is_empty() || new == old.trim() {
        return NumberEdit::Unchanged;
    }
    if !is_integer_like(new) {
        return NumberEdit::Invalid;
    }
    NumberEdit::Commit { old: old.trim().to_string(), new: new.to_string() }
}

/// Digits with an optional leading sign.
pub fn is_integer_like(text: &str) -> bool {
    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Parse the insert point typed by the operator. Must be a non-negative
/// integer.
pub fn parse_insert_point(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err("Please enter a non-negative whole number.".to_string());
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| "Channel number is too large.".to_string())
}

/// One renumbering step of the client-side insert fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftStep {
    pub channel_id: i64,
    pub from: u32,
    pub to: u32,
}

impl fmt::Display for ShiftStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moving {} → {}", self.from, self.to)
    }
}

/// Every channel numbered `at` or higher moves up by one. Steps are ordered
/// from the highest number down so no step lands on an occupied number.
/// A channel already at `u32::MAX` has nowhere to go and is left out.
pub fn plan_insert_shift(channels: &[ChannelRow], at: u32) -> Vec<ShiftStep> {
    let mut steps: Vec<ShiftStep> = channels
        .iter()
        .filter_map(|c| {
            let from = c.number.trim().parse::<u32>().ok()?;
            let to = from.checked_add(1)?;
            (from >= at).then_some(ShiftStep { channel_id: c.id, from, to })
        })
        .collect();
    steps.sort_by(|a, b| b.from.cmp(&a.from));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_unchanged_edits_are_noops() {
        assert_eq!(evaluate_number_edit("12", ""), NumberEdit::Unchanged);
        assert_eq!(evaluate_number_edit("12", "  "), NumberEdit::Unchanged);
        assert_eq!(evaluate_number_edit("12", " 12 "), NumberEdit::Unchanged);
    }

    #[test]
    fn non_integers_are_rejected() {
        assert_eq!(evaluate_number_edit("12", "12a"), NumberEdit::Invalid);
        assert_eq!(evaluate_number_edit("12", "1.5"), NumberEdit::Invalid);
        assert_eq!(evaluate_number_edit("12", "-"), NumberEdit::Invalid);
    }

    #[test]
    fn integer_edit_commits_trimmed_values() {
        assert_eq!(
            evaluate_number_edit("12", " 40 "),
            NumberEdit::Commit { old: "12".into(), new: "40".into() }
        );
    }

    #[test]
    fn insert_point_must_be_non_negative() {
        assert_eq!(parse_insert_point("0"), Ok(0));
        assert_eq!(parse_insert_point(" 250 "), Ok(250));
        assert!(parse_insert_point("-1").is_err());
        assert!(parse_insert_point("abc").is_err());
        assert!(parse_insert_point("").is_err());
    }

    #[test]
    fn shift_skips_the_top_of_the_number_range() {
        let channel = |id: i64, number: &str| ChannelRow {
            id,
            number: number.to_string(),
            name: String::new(),
            category: String::new(),
            logo_url: String::new(),
            active: true,
            epg_entry: String::new(),
            epg_title: String::new(),
            stream_url: String::new(),
        };
        let channels = vec![channel(1, &u32::MAX.to_string()), channel(2, "4294967290")];
        let steps = plan_insert_shift(&channels, 4_294_967_000);
        assert_eq!(steps, vec![ShiftStep { channel_id: 2, from: 4_294_967_290, to: 4_294_967_291 }]);
    }

    #[test]
    fn shift_step_reads_as_progress_line() {
        let step = ShiftStep { channel_id: 1, from: 105, to: 106 };
        assert_eq!(step.to_string(), "Moving 105 → 106");
    }
}
