//! Flat string arguments and the lenient parsers used to read them.
//!
//! Filter and assignment settings arrive as a flat map of string values from
//! a web form, a config file or the command line. Every parser here is total:
//! malformed input falls back to a default instead of failing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Flat argument map keyed by argument name.
pub type Args = BTreeMap<String, String>;

/// Returns the value stored under `key`, or `default` when absent.
#[must_use]
pub fn arg<'a>(args: &'a Args, key: &str, default: &'a str) -> &'a str {
    args.get(key).map_or(default, String::as_str)
}

/// Three-valued filter setting for a boolean level property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    /// The property is ignored.
    #[default]
    DontCare,
    /// At least one required property must hold.
    Required,
    /// No forbidden property may hold.
    Forbidden,
}

impl TriState {
    /// Parses the form encoding: `"y"` is required, `"n"` is forbidden and
    /// anything else is ignored.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "y" => Self::Required,
            "n" => Self::Forbidden,
            _ => Self::DontCare,
        }
    }

    /// Reads the setting stored under `key`, parsing `default` when absent.
    #[must_use]
    pub fn from_arg(args: &Args, key: &str, default: &str) -> Self {
        Self::parse(arg(args, key, default))
    }
}

/// Evaluates a list of `(setting, property)` pairs.
///
/// When any setting is [`TriState::Required`], at least one of the required
/// properties must hold. No property whose setting is
/// [`TriState::Forbidden`] may hold.
#[must_use]
pub fn predicates_pass<I>(predicates: I) -> bool
where
    I: IntoIterator<Item = (TriState, bool)>,
{
    let mut any_required = false;
    let mut required_met = false;
    for (setting, holds) in predicates {
        match setting {
            TriState::Required => {
                any_required = true;
                required_met |= holds;
            }
            TriState::Forbidden if holds => return false,
            TriState::Forbidden | TriState::DontCare => {}
        }
    }
    !any_required || required_met
}

/// Parses a signed integer, returning `default` for malformed input.
#[must_use]
pub fn parse_int_or(value: &str, default: i64) -> i64 {
    value.trim().parse().unwrap_or(default)
}

/// Parses a time into milliseconds.
///
/// Accepts `m:ss.mmm`, `s.mmm` or a bare millisecond count. The fractional
/// digits are read as a plain integer, so `1.5` is 1005 ms. Any other input
/// yields -1, as does a time too large to represent.
#[must_use]
pub fn parse_time_ms(value: &str) -> i64 {
    if let Some((minutes, rest)) = leading_digits(value) {
        if let Some((seconds, millis)) = rest.strip_prefix(':').and_then(seconds_and_millis) {
            return minutes
                .checked_mul(60_000)
                .and_then(|total| total.checked_add(to_millis(seconds, millis)?))
                .unwrap_or(-1);
        }
    }
    if let Some((seconds, millis)) = seconds_and_millis(value) {
        return to_millis(seconds, millis).unwrap_or(-1);
    }
    value.trim().parse().unwrap_or(-1)
}

fn to_millis(seconds: i64, millis: i64) -> Option<i64> {
    seconds.checked_mul(1000)?.checked_add(millis)
}

fn seconds_and_millis(value: &str) -> Option<(i64, i64)> {
    let (seconds, rest) = leading_digits(value)?;
    let rest = rest.strip_prefix('.')?;
    let (millis, _) = leading_digits(rest)?;
    Some((seconds, millis))
}

fn leading_digits(value: &str) -> Option<(i64, &str)> {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    if end == 0 {
        return None;
    }
    let number = value[..end].parse().ok()?;
    Some((number, &value[end..]))
}

/// Parses a comma separated list of names into a lowercase set, dropping
/// blank entries.
#[must_use]
pub fn parse_name_set(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parses a comma separated list of player ids, skipping malformed entries.
#[must_use]
pub fn parse_id_list(value: &str) -> Vec<PlayerId> {
    value
        .split(',')
        .filter_map(|entry| entry.trim().parse().ok())
        .map(PlayerId::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_state_parses_exact_flags() {
        assert_eq!(TriState::parse("y"), TriState::Required);
        assert_eq!(TriState::parse("n"), TriState::Forbidden);
        assert_eq!(TriState::parse(""), TriState::DontCare);
        assert_eq!(TriState::parse("Y"), TriState::DontCare);

        let mut args = Args::new();
        let _ = args.insert("cw-filter".to_owned(), "".to_owned());
        assert_eq!(TriState::from_arg(&args, "cw-filter", "n"), TriState::DontCare);
        assert_eq!(TriState::from_arg(&args, "ccw-filter", "n"), TriState::Forbidden);
    }

    #[test]
    fn required_predicates_are_or_combined() {
        use TriState::{DontCare, Forbidden, Required};

        assert!(predicates_pass([(Required, false), (Required, true)]));
        assert!(!predicates_pass([(Required, false), (DontCare, true)]));
        assert!(predicates_pass([(DontCare, false), (DontCare, true)]));
        assert!(predicates_pass(std::iter::empty()));
        assert!(!predicates_pass([(Required, true), (Forbidden, true)]));
        assert!(predicates_pass([(Required, true), (Forbidden, false)]));
    }

    #[test]
    fn times_parse_in_every_format() {
        assert_eq!(parse_time_ms("3:00.000"), 180_000);
        assert_eq!(parse_time_ms("1:02.345"), 62_345);
        assert_eq!(parse_time_ms("12.500"), 12_500);
        assert_eq!(parse_time_ms("4500"), 4500);
        assert_eq!(parse_time_ms(" 4500 "), 4500);
        assert_eq!(parse_time_ms(""), -1);
        assert_eq!(parse_time_ms("soon"), -1);
        assert_eq!(parse_time_ms("1:02.345 extra"), 62_345);
        assert_eq!(parse_time_ms("999999999999999:00.000"), -1);
        assert_eq!(parse_time_ms("1:9999999999999999.000"), -1);
        assert_eq!(parse_time_ms("9999999999999999.000"), -1);
        assert_eq!(parse_time_ms("1:00.9999999999999999999"), -1);
    }

    #[test]
    fn integers_fall_back_to_default() {
        assert_eq!(parse_int_or("12", 5), 12);
        assert_eq!(parse_int_or(" -1 ", 5), -1);
        assert_eq!(parse_int_or("twelve", 5), 5);
        assert_eq!(parse_int_or("", -1), -1);
    }

    #[test]
    fn name_sets_are_lowercase_and_trimmed() {
        let names = parse_name_set(" Alice, BOB ,,alice");
        assert_eq!(names.len(), 2);
        assert!(names.contains("alice"));
        assert!(names.contains("bob"));
        assert!(parse_name_set("").is_empty());
    }

    #[test]
    fn id_lists_skip_malformed_entries() {
        assert_eq!(
            parse_id_list("7, 12,x,,3"),
            vec![PlayerId::new(7), PlayerId::new(12), PlayerId::new(3)]
        );
        assert!(parse_id_list("").is_empty());
    }
}
