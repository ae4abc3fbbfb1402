//! On-disk naming and encoding of a single slot.
//!
//! A slot is `appeal<N>.js` holding a comment line with the creation time
//! followed by `module.exports = <pretty JSON>;`. Directories written by
//! earlier deployments use the same layout and stay readable.

use appeal_shared::{Appeal, time};
use chrono::{DateTime, Local};

pub const SLOT_PREFIX: &str = "appeal";
pub const SLOT_EXTENSION: &str = ".js";

const EXPORT_PREFIX: &str = "module.exports =";

pub fn file_name(id: u64) -> String {
    format!("{}{}{}", SLOT_PREFIX, id, SLOT_EXTENSION)
}

/// Identifier of a slot file name, `None` for anything else in the directory.
pub fn parse_file_name(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(SLOT_PREFIX)?.strip_suffix(SLOT_EXTENSION)?;
    parse_digits(digits)
}

/// Accepts both `7` and the slot name form `appeal7`.
pub fn parse_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(SLOT_PREFIX).unwrap_or(raw);
    parse_digits(digits)
}

fn parse_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&id| id > 0)
}

/// The comment line repeats the record's `submittedAt`; `at` only fills in
/// for records that carry none.
pub fn encode(appeal: &Appeal, at: DateTime<Local>) -> Result<String, serde_json::Error> {
    let submitted = if appeal.submitted_at.is_empty() {
        time::human_readable(at)
    } else {
        appeal.submitted_at.clone()
    };

    Ok(format!(
        "// Appeal submitted on {}\n{} {};\n",
        submitted,
        EXPORT_PREFIX,
        serde_json::to_string_pretty(appeal)?
    ))
}

pub fn decode(content: &str) -> Result<Appeal, String> {
    let body: String = content
        .lines()
        .skip_while(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with("//")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let json = body
        .trim()
        .strip_prefix(EXPORT_PREFIX)
        .ok_or_else(|| "missing module.exports".to_string())?
        .trim()
        .trim_end_matches(';')
        .trim_end();

    serde_json::from_str(json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_names_sort_numerically_not_lexicographically() {
        let mut ids: Vec<u64> = ["appeal10.js", "appeal2.js", "appeal1.js"]
            .iter()
            .filter_map(|n| parse_file_name(n))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 10]);
    }

    #[test]
    fn unrelated_files_are_not_slots() {
        for name in ["notes.txt", "appeal.js", "appealx.js", "appeal3.json", "appeal0.js", "appeal-1.js"] {
            assert_eq!(parse_file_name(name), None, "{}", name);
        }
        assert_eq!(parse_file_name(&file_name(42)), Some(42));
    }

    #[test]
    fn ids_accept_plain_and_slot_forms() {
        assert_eq!(parse_id("7"), Some(7));
        assert_eq!(parse_id("appeal7"), Some(7));
        assert_eq!(parse_id("appeal"), None);
        assert_eq!(parse_id("../etc/passwd"), None);
    }

    #[test]
    fn encoded_slot_carries_time_comment_and_decodes_back() {
        let at = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let appeal = Appeal {
            username: "someone#4242".into(),
            user_id: "123456789012345678".into(),
            reason: "a reason".into(),
            ..Default::default()
        };

        let content = encode(&appeal, at).unwrap();
        assert!(content.starts_with("// Appeal submitted on 1/2/2025, 3:04:05 AM\n"));
        assert!(content.contains("module.exports = {"));
        assert_eq!(decode(&content).unwrap(), appeal);
    }

    #[test]
    fn comment_line_matches_submitted_at() {
        let appeal = Appeal {
            username: "someone#4242".into(),
            submitted_at: "3/14/2025, 9:05:07 PM".into(),
            ..Default::default()
        };
        let later = Local.with_ymd_and_hms(2025, 3, 14, 21, 5, 8).unwrap();

        let content = encode(&appeal, later).unwrap();

        assert!(content.starts_with("// Appeal submitted on 3/14/2025, 9:05:07 PM\n"));
    }

    #[test]
    fn decodes_slots_written_without_trailing_newline() {
        let legacy = "// Appeal submitted on 5/6/2024, 1:00:00 PM\nmodule.exports = {\n  \"username\": \"x@y\",\n  \"userId\": \"1\",\n  \"reason\": \"r\"\n};";
        let appeal = decode(legacy).unwrap();
        assert_eq!(appeal.username, "x@y");
    }

    #[test]
    fn rejects_content_without_export() {
        assert!(decode("// just a comment\n{}").is_err());
    }
}
