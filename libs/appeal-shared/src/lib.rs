use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// Header carrying the pre-shared API key on every authenticated request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A user's request for reconsideration of a moderation action.
///
/// Every field reads as an empty string when it is missing or `null` in a JSON
/// body, so "absent" and "empty" look the same to whoever checks the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appeal {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub server_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub action_type: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub reason: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub rules_understood: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub future: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub submitted_at: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Appeal {
    /// Fields the server refuses to store without.
    pub fn missing_required(&self) -> bool {
        self.username.is_empty() || self.user_id.is_empty() || self.reason.is_empty()
    }

    /// Fills `timestamp` and `submittedAt` from `now` unless the submitter set them.
    pub fn stamp(&mut self, now: DateTime<Local>) {
        if self.timestamp.is_empty() {
            self.timestamp = time::machine_readable(now);
        }
        if self.submitted_at.is_empty() {
            self.submitted_at = time::human_readable(now);
        }
    }
}

pub mod options {
    use std::fmt;
    use std::str::FromStr;

    /// Moderation action being appealed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ActionType {
        Ban,
        Kick,
        Timeout,
        Mute,
        Warn,
    }

    impl ActionType {
        pub const ALL: [ActionType; 5] = [
            ActionType::Ban,
            ActionType::Kick,
            ActionType::Timeout,
            ActionType::Mute,
            ActionType::Warn,
        ];

        pub fn as_str(&self) -> &'static str {
            match self {
                ActionType::Ban => "ban",
                ActionType::Kick => "kick",
                ActionType::Timeout => "timeout",
                ActionType::Mute => "mute",
                ActionType::Warn => "warn",
            }
        }

        pub fn label(&self) -> &'static str {
            match self {
                ActionType::Ban => "Ban",
                ActionType::Kick => "Kick",
                ActionType::Timeout => "Timeout",
                ActionType::Mute => "Mute",
                ActionType::Warn => "Warning",
            }
        }
    }

    impl fmt::Display for ActionType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    impl FromStr for ActionType {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            ActionType::ALL
                .into_iter()
                .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
                .ok_or_else(|| format!("unknown action type: {}", s))
        }
    }

    /// Whether the appellant says they have read the server rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RulesUnderstood {
        Yes,
        Partially,
        No,
    }

    impl RulesUnderstood {
        pub const ALL: [RulesUnderstood; 3] =
            [RulesUnderstood::Yes, RulesUnderstood::Partially, RulesUnderstood::No];

        pub fn as_str(&self) -> &'static str {
            match self {
                RulesUnderstood::Yes => "yes",
                RulesUnderstood::Partially => "partially",
                RulesUnderstood::No => "no",
            }
        }

        pub fn label(&self) -> &'static str {
            match self {
                RulesUnderstood::Yes => "Yes, I have read and understand the rules",
                RulesUnderstood::Partially => "Partially",
                RulesUnderstood::No => "No",
            }
        }
    }

    impl fmt::Display for RulesUnderstood {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    impl FromStr for RulesUnderstood {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            RulesUnderstood::ALL
                .into_iter()
                .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
                .ok_or_else(|| format!("unknown answer: {}", s))
        }
    }
}

pub mod api {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthResponse {
        pub status: String,
        pub message: String,
        #[serde(default)]
        pub version: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SubmitResponse {
        pub success: bool,
        pub message: String,
        pub appeal_id: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ListResponse {
        pub success: bool,
        pub count: usize,
        pub appeals: Vec<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AppealResponse {
        pub success: bool,
        pub appeal: Appeal,
    }

    /// Body of every failed request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        #[serde(default)]
        pub success: bool,
        pub message: String,
    }
}

pub mod time {
    use chrono::{DateTime, Local, SecondsFormat, Utc};

    pub fn machine_readable(at: DateTime<Local>) -> String {
        at.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// e.g. `3/14/2025, 9:05:07 PM`
    pub fn human_readable(at: DateTime<Local>) -> String {
        at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::options::{ActionType, RulesUnderstood};
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn appeal_uses_camel_case_and_defaults_missing_fields() {
        let appeal: Appeal =
            serde_json::from_str(r#"{"username":"mod#0001","userId":"123"}"#).unwrap();
        assert_eq!(appeal.username, "mod#0001");
        assert_eq!(appeal.user_id, "123");
        assert!(appeal.reason.is_empty());

        let json = serde_json::to_value(&appeal).unwrap();
        assert!(json.get("serverName").is_some());
        assert!(json.get("submittedAt").is_some());
    }

    #[test]
    fn null_fields_read_as_empty() {
        let appeal: Appeal = serde_json::from_str(
            r#"{"username":null,"userId":"123","serverName":null,"reason":"r"}"#,
        )
        .unwrap();
        assert_eq!(appeal.username, "");
        assert_eq!(appeal.server_name, "");
        assert!(appeal.missing_required());

        assert!(serde_json::from_str::<Appeal>(r#"{"username":42}"#).is_err());
    }

    #[test]
    fn missing_required_checks_username_user_id_and_reason() {
        let full = Appeal {
            username: "a#1".into(),
            user_id: "1".into(),
            reason: "r".into(),
            ..Default::default()
        };
        assert!(!full.missing_required());

        for strip in 0..3 {
            let mut appeal = full.clone();
            match strip {
                0 => appeal.username.clear(),
                1 => appeal.user_id.clear(),
                _ => appeal.reason.clear(),
            }
            assert!(appeal.missing_required());
        }
    }

    #[test]
    fn stamp_keeps_client_supplied_times() {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 21, 5, 7).unwrap();

        let mut blank = Appeal::default();
        blank.stamp(now);
        assert_eq!(blank.submitted_at, "3/14/2025, 9:05:07 PM");
        assert!(!blank.timestamp.is_empty());

        let mut preset = Appeal {
            timestamp: "2020-01-01T00:00:00.000Z".into(),
            submitted_at: "earlier".into(),
            ..Default::default()
        };
        preset.stamp(now);
        assert_eq!(preset.timestamp, "2020-01-01T00:00:00.000Z");
        assert_eq!(preset.submitted_at, "earlier");
    }

    #[test]
    fn option_sets_parse_their_wire_values() {
        assert_eq!("ban".parse::<ActionType>().unwrap(), ActionType::Ban);
        assert_eq!(" Mute ".parse::<ActionType>().unwrap(), ActionType::Mute);
        assert!("banish".parse::<ActionType>().is_err());
        assert_eq!("partially".parse::<RulesUnderstood>().unwrap(), RulesUnderstood::Partially);
    }
}
