//! `key:value` text as carried in diagnostic, PIS and telemetry strings.
//!
//! ```text
//!   "line: 12 , stop:Main St,  stopsleft:4"
//!     ├─ "line"      => "12"
//!     ├─ "stop"      => "Main St"
//!     └─ "stopsleft" => "4"
//! ```
//!
//! Entries are separated by `,` and split at the first `:`, so values may
//! themselves contain colons (`time:12:30:05`). Keys and values are
//! trimmed. An entry with no colon or an empty key is malformed and
//! skipped; blank entries (e.g. a trailing comma) are ignored silently.

use std::collections::BTreeMap;

use crate::error::DecodeWarning;
use crate::reader::PayloadReader;

/// Iterator over the entries of a pair list, in text order.
#[derive(Clone, Debug)]
pub struct Pairs<'a> {
    entries: std::str::Split<'a, char>,
}

/// Split `text` into `(key, value)` entries.
pub fn split_pairs(text: &str) -> Pairs<'_> {
    Pairs {
        entries: text.split(','),
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Result<(&'a str, &'a str), DecodeWarning>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.entries.next()?.trim();
            if entry.is_empty() {
                continue;
            }
            return Some(match entry.split_once(':') {
                Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
                _ => Err(DecodeWarning::MalformedPair {
                    pair: entry.to_string(),
                }),
            });
        }
    }
}

/// Parse `text` into a map, later duplicates overwriting earlier ones.
/// Malformed entries are reported on `reader` and skipped.
pub fn collect_pairs(text: &str, reader: &mut PayloadReader<'_>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for entry in split_pairs(text) {
        match entry {
            Ok((key, value)) => {
                map.insert(key.to_string(), value.to_string());
            }
            Err(warning) => reader.warn(warning),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (BTreeMap<String, String>, Vec<DecodeWarning>) {
        let mut r = PayloadReader::new(&[]);
        let map = collect_pairs(text, &mut r);
        (map, r.into_warnings())
    }

    #[test]
    fn trims_and_splits_at_first_colon() {
        let (map, warnings) = parse(" line: 12 , time:12:30:05,stop :Main St ");
        assert!(warnings.is_empty());
        assert_eq!(map["line"], "12");
        assert_eq!(map["time"], "12:30:05");
        assert_eq!(map["stop"], "Main St");
    }

    #[test]
    fn last_write_wins() {
        let (map, _) = parse("a:1,b:2,a:3");
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "3");
    }

    #[test]
    fn malformed_entries_are_skipped_with_warning() {
        let (map, warnings) = parse("novalue,:orphan,ok:1");
        assert_eq!(map.len(), 1);
        assert_eq!(
            warnings,
            vec![
                DecodeWarning::MalformedPair {
                    pair: "novalue".into()
                },
                DecodeWarning::MalformedPair {
                    pair: ":orphan".into()
                },
            ]
        );
    }

    #[test]
    fn blank_entries_are_ignored() {
        let (map, warnings) = parse("a:1,, ,");
        assert_eq!(map.len(), 1);
        assert!(warnings.is_empty());
        assert!(parse("").0.is_empty());
    }

    #[test]
    fn empty_value_is_kept() {
        let (map, _) = parse("key:");
        assert_eq!(map["key"], "");
    }

    #[test]
    fn iterator_preserves_text_order() {
        let keys: Vec<_> = split_pairs("z:1,a:2,m:3")
            .filter_map(Result::ok)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
