pub mod client;
pub mod form;
pub mod handler;
pub mod prompt;
pub mod view;

pub use client::{AppealClient, ClientError};
pub use form::{AppealForm, FormError};
pub use handler::{FormHandler, SubmitOutcome};
pub use view::{FormView, ViewState};
