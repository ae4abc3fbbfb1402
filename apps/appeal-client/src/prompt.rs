use anyhow::{Context, Result};
use appeal_shared::options::{ActionType, RulesUnderstood};
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::form::AppealForm;

/// Field values given on the command line; anything left out is asked for.
#[derive(Debug, Default, Clone)]
pub struct FormFields {
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub server_name: Option<String>,
    pub action_type: Option<ActionType>,
    pub reason: Option<String>,
    pub rules_understood: Option<RulesUnderstood>,
    pub future: Option<String>,
}

impl FormFields {
    /// Builds the form without asking; missing values stay empty and are
    /// caught by validation.
    pub fn into_form(self) -> AppealForm {
        AppealForm {
            username: self.username.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            server_name: self.server_name.unwrap_or_default(),
            action_type: self.action_type.map(|a| a.as_str().to_string()).unwrap_or_default(),
            reason: self.reason.unwrap_or_default(),
            rules_understood: self
                .rules_understood
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
            future: self.future.unwrap_or_default(),
        }
    }

    pub fn prompt_missing(self) -> Result<AppealForm> {
        let theme = ColorfulTheme::default();

        let action_type = match self.action_type {
            Some(a) => a,
            None => pick(&theme, "What action was taken against you?", &ActionType::ALL)?,
        };
        let rules_understood = match self.rules_understood {
            Some(r) => r,
            None => pick(&theme, "Have you read and understood the server rules?", &RulesUnderstood::ALL)?,
        };

        Ok(AppealForm {
            username: get_or_prompt_text(&theme, self.username, "Discord username (e.g. Username#1234)")?,
            user_id: get_or_prompt_text(&theme, self.user_id, "Discord user ID")?,
            server_name: get_or_prompt_text(&theme, self.server_name, "Server name")?,
            action_type: action_type.as_str().to_string(),
            reason: get_or_prompt_text(&theme, self.reason, "Why should this action be reconsidered? (min 50 chars)")?,
            rules_understood: rules_understood.as_str().to_string(),
            future: get_or_prompt_text(&theme, self.future, "How will you behave in future? (min 30 chars)")?,
        })
    }
}

fn get_or_prompt_text(theme: &ColorfulTheme, value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(v) = value {
        let trimmed = v.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("Failed to read '{}'", prompt))?;

    Ok(input.trim().to_string())
}

fn pick<T: Copy + ToString>(theme: &ColorfulTheme, prompt: &str, options: &[T]) -> Result<T> {
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()
        .with_context(|| format!("Failed to read '{}'", prompt))?;

    Ok(options[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_form_uses_wire_values_for_options() {
        let form = FormFields {
            username: Some("a#1".into()),
            action_type: Some(ActionType::Timeout),
            rules_understood: Some(RulesUnderstood::Yes),
            ..Default::default()
        }
        .into_form();

        assert_eq!(form.action_type, "timeout");
        assert_eq!(form.rules_understood, "yes");
        assert!(form.server_name.is_empty());
    }
}
