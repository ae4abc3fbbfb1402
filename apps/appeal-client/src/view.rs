use std::time::{Duration, Instant};

use console::style;

/// How long an error banner stays up before the form returns to idle.
pub const ERROR_DISPLAY: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Error { message: String, shown_at: Instant },
    /// Terminal: replaces the whole form.
    Success { appeal_id: u64 },
}

#[derive(Debug)]
pub struct FormView {
    state: ViewState,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The submit control is hidden while loading and gone after success.
    pub fn can_submit(&self) -> bool {
        !matches!(self.state, ViewState::Loading | ViewState::Success { .. })
    }

    pub fn show_loading(&mut self) {
        if !self.is_done() {
            self.state = ViewState::Loading;
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        if !self.is_done() {
            self.state = ViewState::Error {
                message: message.into(),
                shown_at: now,
            };
        }
    }

    pub fn show_success(&mut self, appeal_id: u64) {
        self.state = ViewState::Success { appeal_id };
    }

    /// Drops an error banner once it has been visible for [`ERROR_DISPLAY`].
    pub fn refresh(&mut self, now: Instant) {
        if let ViewState::Error { shown_at, .. } = &self.state {
            if now.saturating_duration_since(*shown_at) >= ERROR_DISPLAY {
                self.state = ViewState::Idle;
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, ViewState::Success { .. })
    }
}

pub fn render(view: &FormView) -> String {
    match view.state() {
        ViewState::Idle => "Ready to submit.".to_string(),
        ViewState::Loading => format!("{}", style("Submitting appeal...").dim()),
        ViewState::Error { message, .. } => format!("{} {}", style("✗").red().bold(), style(message).red()),
        ViewState::Success { appeal_id } => format!(
            "{} Appeal submitted (reference #{}).\nStaff will review it; you do not need to submit again.",
            style("✓").green().bold(),
            appeal_id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_submittable() {
        let view = FormView::new();
        assert_eq!(view.state(), &ViewState::Idle);
        assert!(view.can_submit());
    }

    #[test]
    fn loading_blocks_submit() {
        let mut view = FormView::new();
        view.show_loading();
        assert!(!view.can_submit());
    }

    #[test]
    fn error_banner_auto_dismisses_after_eight_seconds() {
        let mut view = FormView::new();
        let shown = Instant::now();
        view.show_error("boom", shown);

        view.refresh(shown + Duration::from_millis(7_999));
        assert!(matches!(view.state(), ViewState::Error { .. }));
        assert!(view.can_submit());

        view.refresh(shown + ERROR_DISPLAY);
        assert_eq!(view.state(), &ViewState::Idle);
    }

    #[test]
    fn success_is_terminal() {
        let mut view = FormView::new();
        view.show_loading();
        view.show_success(3);

        view.show_error("late failure", Instant::now());
        view.show_loading();

        assert_eq!(view.state(), &ViewState::Success { appeal_id: 3 });
        assert!(!view.can_submit());
        assert!(render(&view).contains("#3"));
    }
}
