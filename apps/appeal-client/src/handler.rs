use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::Local;
use tracing::{debug, error, info};

use crate::client::{failure_message, AppealClient};
use crate::form::{AppealForm, FormError};
use crate::view::{FormView, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted { appeal_id: u64 },
    /// Rejected locally; nothing was sent.
    Invalid(FormError),
    /// Sent, but failed. Carries the user-facing message.
    Failed(String),
    /// Another submission was in flight, or the form is already done.
    Ignored,
}

/// Drives one form: validation, the single in-flight request and the view.
pub struct FormHandler {
    client: AppealClient,
    view: Mutex<FormView>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FormHandler {
    pub fn new(client: AppealClient) -> Self {
        Self {
            client,
            view: Mutex::new(FormView::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current view, with an expired error banner already dismissed.
    pub fn view(&self) -> MutexGuard<'_, FormView> {
        self.view_at(Instant::now())
    }

    pub fn view_at(&self, now: Instant) -> MutexGuard<'_, FormView> {
        let mut view = self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        view.refresh(now);
        view
    }

    pub fn state(&self) -> ViewState {
        self.view().state().clone()
    }

    pub fn state_at(&self, now: Instant) -> ViewState {
        self.view_at(now).state().clone()
    }

    pub async fn submit(&self, form: &AppealForm) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        let _in_flight = InFlight(&self.in_flight);

        if !self.view().can_submit() {
            return SubmitOutcome::Ignored;
        }

        if let Err(e) = form.validate() {
            self.view().show_error(e.to_string(), Instant::now());
            return SubmitOutcome::Invalid(e);
        }

        self.view().show_loading();
        let appeal = form.to_appeal(Local::now());
        info!("Sending appeal to {}", self.client.submit_url());

        match self.client.submit(&appeal).await {
            Ok(response) => {
                info!("Appeal accepted: {}", response.message);
                self.view().show_success(response.appeal_id);
                SubmitOutcome::Submitted {
                    appeal_id: response.appeal_id,
                }
            }
            Err(e) => {
                error!("Error submitting appeal: {}", e);
                let message = failure_message(&e, &self.client.submit_url());
                self.view().show_error(message.clone(), Instant::now());
                SubmitOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ERROR_DISPLAY;
    use std::time::Duration;

    fn offline_handler() -> FormHandler {
        FormHandler::new(AppealClient::new("http://127.0.0.1:9/api", "key"))
    }

    #[tokio::test]
    async fn error_banner_returns_to_idle_after_display_time() {
        let handler = offline_handler();

        let outcome = handler.submit(&AppealForm::default()).await;
        assert_eq!(outcome, SubmitOutcome::Invalid(FormError::MissingFields));

        let shown = Instant::now();
        assert!(matches!(handler.state(), ViewState::Error { .. }));
        assert!(matches!(
            handler.state_at(shown + Duration::from_secs(1)),
            ViewState::Error { .. }
        ));
        assert_eq!(handler.state_at(shown + ERROR_DISPLAY), ViewState::Idle);
        assert_eq!(handler.state(), ViewState::Idle);
    }
}
