#![forbid(unsafe_code)]

//! Contact form validation and submission lifecycle.
//!
//! # Field validation
//!
//! A field is validated on blur, and again on every input while it is shown
//! as invalid. Validation only toggles the `error` class and `aria-invalid`
//! on the input and sets or clears the adjacent error text. The error text is
//! empty iff the field is valid.
//!
//! # Submission
//!
//! ```text
//!            submit (any field invalid)
//!   Idle ──────────────────────────────▶ Idle   (errors shown, focus first invalid)
//!    │
//!    │ submit (all valid)
//!    ▼
//!   Submitting ── delay elapses ──▶ Idle   (fields cleared, conversion reported)
//! ```
//!
//! While `Submitting` the trigger is disabled and further submits are ignored.
//! The remote round trip is an injected [`SubmissionSink`] invoked when the
//! delay elapses; there is no retry.

pub mod phone;
pub mod validate;

use pagectl_core::config::FormConfig;
use pagectl_core::{Analytics, CapabilityError, DomOp, NodeRef, Patch};
use serde::Serialize;

use crate::markup::{FieldMarkup, FormMarkup};
use crate::tracking;
use crate::turn::{TimerKey, Turn};

pub use phone::format_phone;
pub use validate::FieldId;

/// Name/value pairs of a submitted form, in document order. A name may
/// repeat (checkbox groups).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder form of [`FormData::append`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// First value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Structured payload handed to the remote submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub services: Vec<String>,
    pub message: Option<String>,
}

impl ContactPayload {
    #[must_use]
    pub fn from_form(data: &FormData) -> Self {
        let field = |f: FieldId| data.get(f.name()).unwrap_or_default().to_owned();
        Self {
            first_name: field(FieldId::FirstName),
            last_name: field(FieldId::LastName),
            email: field(FieldId::Email),
            phone: field(FieldId::Phone),
            address: field(FieldId::Address),
            services: data
                .get_all("services")
                .into_iter()
                .map(str::to_owned)
                .collect(),
            message: data.get("message").map(str::to_owned),
        }
    }
}

/// Remote submission collaborator.
pub trait SubmissionSink {
    /// Deliver `payload`. Called once per successful submit.
    fn submit(&self, payload: &ContactPayload) -> Result<(), CapabilityError>;
}

/// Stand-in sink that acknowledges every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSubmission;

impl SubmissionSink for SimulatedSubmission {
    fn submit(&self, payload: &ContactPayload) -> Result<(), CapabilityError> {
        tracing::debug!(
            target: "pagectl.form",
            services = payload.services.len(),
            "simulated submission acknowledged"
        );
        Ok(())
    }
}

/// Submission lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// How the last settled submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Acknowledged,
    Failed(CapabilityError),
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Validation failed; focus moved to the first invalid field.
    Blocked { first_invalid: FieldId },
    /// All fields valid; the simulated round trip started.
    Started,
    /// A submission is already in flight.
    Ignored,
}

#[derive(Debug, Clone)]
struct FieldState {
    markup: FieldMarkup,
    value: String,
    valid: Option<bool>,
}

impl FieldState {
    fn error_message(&self) -> &'static str {
        match self.valid {
            Some(false) => self.markup.id.message(),
            _ => "",
        }
    }
}

/// Contact form controller.
#[derive(Debug, Clone)]
pub struct ContactForm {
    form: NodeRef,
    submit: NodeRef,
    fields: Vec<FieldState>,
    phase: SubmissionPhase,
    pending: Option<ContactPayload>,
    last_outcome: Option<SubmissionOutcome>,
    config: FormConfig,
}

impl ContactForm {
    #[must_use]
    pub fn new(markup: FormMarkup, config: FormConfig) -> Self {
        Self {
            form: markup.form,
            submit: markup.submit,
            fields: markup
                .fields
                .into_iter()
                .map(|markup| FieldState {
                    markup,
                    value: String::new(),
                    valid: None,
                })
                .collect(),
            phase: SubmissionPhase::Idle,
            pending: None,
            last_outcome: None,
            config,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether `node` is one of the validated inputs.
    #[must_use]
    pub fn owns(&self, node: NodeRef) -> bool {
        self.fields.iter().any(|f| f.markup.input == node)
    }

    /// Current value of `field` as last seen by the controller.
    #[must_use]
    pub fn value(&self, field: FieldId) -> Option<&str> {
        self.field(field).map(|f| f.value.as_str())
    }

    /// `Some(valid)` once the field has been validated at least once.
    #[must_use]
    pub fn is_valid(&self, field: FieldId) -> Option<bool> {
        self.field(field).and_then(|f| f.valid)
    }

    /// Error text currently displayed for `field` (empty iff valid).
    #[must_use]
    pub fn error_message(&self, field: FieldId) -> &'static str {
        self.field(field).map_or("", FieldState::error_message)
    }

    fn field(&self, field: FieldId) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.markup.id == field)
    }

    /// A validated input lost focus.
    pub fn on_blur(&mut self, node: NodeRef, value: &str, patch: &mut Patch) {
        if let Some(index) = self.index_of(node) {
            self.validate_at(index, value, patch);
        }
    }

    /// A validated input changed; revalidate only while it shows an error.
    pub fn on_input(&mut self, node: NodeRef, value: &str, patch: &mut Patch) {
        let Some(index) = self.index_of(node) else {
            return;
        };
        if self.fields[index].valid == Some(false) {
            self.validate_at(index, value, patch);
        } else {
            self.fields[index].value = value.to_owned();
        }
    }

    fn index_of(&self, node: NodeRef) -> Option<usize> {
        self.fields.iter().position(|f| f.markup.input == node)
    }

    fn validate_at(&mut self, index: usize, value: &str, patch: &mut Patch) -> bool {
        let state = &mut self.fields[index];
        let valid = state.markup.id.validate(value);
        state.value = value.to_owned();
        state.valid = Some(valid);
        let input = state.markup.input;
        patch.toggle_class(input, "error", !valid);
        patch.set_flag(input, "aria-invalid", !valid);
        if let Some(slot) = state.markup.error_slot {
            patch.set_text(slot, state.error_message());
        }
        valid
    }

    /// Validate every field and, if all pass, start the submission.
    pub fn submit(&mut self, data: &FormData, turn: &mut Turn<'_>) -> SubmitResult {
        if self.phase == SubmissionPhase::Submitting {
            tracing::debug!(target: "pagectl.form", "submit ignored while in flight");
            return SubmitResult::Ignored;
        }

        let mut first_invalid = None;
        for index in 0..self.fields.len() {
            let id = self.fields[index].markup.id;
            let value = data.get(id.name()).unwrap_or_default();
            if !self.validate_at(index, value, turn.patch()) && first_invalid.is_none() {
                first_invalid = Some(index);
            }
        }

        if let Some(index) = first_invalid {
            let field = self.fields[index].markup;
            turn.patch().focus(field.input);
            tracing::debug!(target: "pagectl.form", field = field.id.name(), "submit blocked");
            return SubmitResult::Blocked {
                first_invalid: field.id,
            };
        }

        self.phase = SubmissionPhase::Submitting;
        self.pending = Some(ContactPayload::from_form(data));
        let patch = turn.patch();
        patch.toggle_class(self.submit, "loading", true);
        patch.set_disabled(self.submit, true);
        turn.schedule_in(TimerKey::SubmissionSettle, self.config.submission_delay);
        tracing::debug!(target: "pagectl.form", "submission started");
        SubmitResult::Started
    }

    /// The submission delay elapsed: hand the payload to `sink` and settle.
    pub fn settle(
        &mut self,
        sink: &dyn SubmissionSink,
        analytics: &dyn Analytics,
        patch: &mut Patch,
    ) -> Option<&SubmissionOutcome> {
        if self.phase != SubmissionPhase::Submitting {
            return None;
        }
        let payload = self.pending.take()?;
        self.phase = SubmissionPhase::Idle;
        patch.toggle_class(self.submit, "loading", false);
        patch.set_disabled(self.submit, false);

        let outcome = match sink.submit(&payload) {
            Ok(()) => {
                patch.push(DomOp::Alert {
                    message: self.config.success_message.clone(),
                });
                patch.push(DomOp::ResetForm { form: self.form });
                for field in &mut self.fields {
                    field.value.clear();
                    field.valid = None;
                }
                tracking::report_lead(analytics);
                tracing::debug!(target: "pagectl.form", "submission settled");
                SubmissionOutcome::Acknowledged
            }
            Err(err) => {
                patch.push(DomOp::Alert {
                    message: self.config.failure_message.clone(),
                });
                tracing::warn!(target: "pagectl.form", error = %err, "submission failed");
                SubmissionOutcome::Failed(err)
            }
        };
        self.last_outcome = Some(outcome);
        self.last_outcome.as_ref()
    }
}
