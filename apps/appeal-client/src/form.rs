use appeal_shared::{time, Appeal};
use chrono::{DateTime, Local};
use thiserror::Error;

pub const REASON_MIN_CHARS: usize = 50;
pub const FUTURE_MIN_CHARS: usize = 30;

/// Raw values as entered; free-text fields are trimmed on use, the two
/// dropdown values are taken as-is.
#[derive(Debug, Clone, Default)]
pub struct AppealForm {
    pub username: String,
    pub user_id: String,
    pub server_name: String,
    pub action_type: String,
    pub reason: String,
    pub rules_understood: String,
    pub future: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Please enter a valid Discord username (e.g., Username#1234)")]
    InvalidUsername,

    #[error("Please enter a valid Discord User ID (17-19 digits)")]
    InvalidUserId,

    #[error("Please provide a more detailed explanation (minimum 50 characters)")]
    ReasonTooShort,

    #[error("Please provide more detail about your future behavior (minimum 30 characters)")]
    FutureTooShort,
}

impl AppealForm {
    /// Rules run in order and the first failure is the only one reported.
    pub fn validate(&self) -> Result<(), FormError> {
        let username = self.username.trim();
        let user_id = self.user_id.trim();
        let reason = self.reason.trim();
        let future = self.future.trim();

        let required = [
            username,
            user_id,
            self.server_name.trim(),
            self.action_type.as_str(),
            reason,
            self.rules_understood.as_str(),
            future,
        ];
        if required.iter().any(|v| v.is_empty()) {
            return Err(FormError::MissingFields);
        }

        if !username.contains('#') && !username.contains('@') {
            return Err(FormError::InvalidUsername);
        }

        if !is_discord_id(user_id) {
            return Err(FormError::InvalidUserId);
        }

        if reason.chars().count() < REASON_MIN_CHARS {
            return Err(FormError::ReasonTooShort);
        }

        if future.chars().count() < FUTURE_MIN_CHARS {
            return Err(FormError::FutureTooShort);
        }

        Ok(())
    }

    pub fn to_appeal(&self, now: DateTime<Local>) -> Appeal {
        Appeal {
            username: self.username.trim().to_string(),
            user_id: self.user_id.trim().to_string(),
            server_name: self.server_name.trim().to_string(),
            action_type: self.action_type.clone(),
            reason: self.reason.trim().to_string(),
            rules_understood: self.rules_understood.clone(),
            future: self.future.trim().to_string(),
            timestamp: time::machine_readable(now),
            submitted_at: time::human_readable(now),
        }
    }
}

/// 17 to 19 ASCII digits.
fn is_discord_id(value: &str) -> bool {
    (17..=19).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
