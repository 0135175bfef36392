use serde::Serialize;

use super::submission::SubmitError;
use super::validation::{format_phone, is_valid_email, is_valid_name, is_valid_phone};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Email,
    Company,
    Message,
}

impl Field {
    /// Form order, which is also the order errors are searched in.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Phone,
        Field::Email,
        Field::Company,
        Field::Message,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Element id and `name` attribute of the field's control.
    pub fn id(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Company => "company",
            Field::Message => "message",
        }
    }

    fn validator(self) -> Option<fn(&str) -> bool> {
        match self {
            Field::Name => Some(is_valid_name),
            Field::Phone => Some(is_valid_phone),
            Field::Email => Some(is_valid_email),
            Field::Company | Field::Message => None,
        }
    }

    pub fn is_validated(self) -> bool {
        self.validator().is_some()
    }

    /// Unconstrained fields are always valid.
    pub fn accepts(self, value: &str) -> bool {
        self.validator().map_or(true, |check| check(value))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

impl FormSnapshot {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::Message => &mut self.message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitDecision {
    /// A submission is already in flight.
    Busy,
    /// At least one required field failed; `first` is the one to focus.
    Invalid { first: Field },
    Accepted(FormSnapshot),
}

/// The inline success notice: created on the first success and reused afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuccessBanner {
    pub created: bool,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContactFormState {
    values: FormSnapshot,
    errors: [bool; 5],
    phase: SubmissionPhase,
    success: SuccessBanner,
}

impl Default for ContactFormState {
    fn default() -> Self {
        Self {
            values: FormSnapshot::default(),
            errors: [false; 5],
            phase: SubmissionPhase::Idle,
            success: SuccessBanner::default(),
        }
    }
}

impl ContactFormState {
    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors[field.index()]
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn success(&self) -> SuccessBanner {
        self.success
    }

    /// Fields without an error slot (company, message) are left alone.
    pub fn set_error(&mut self, field: Field, show: bool) {
        if field.is_validated() {
            self.errors[field.index()] = show;
        }
    }

    pub fn blur(&mut self, field: Field) {
        let valid = field.accepts(self.value(field));
        self.set_error(field, !valid);
    }

    /// Stores the new raw value and returns what the control should display.
    /// Only the phone field rewrites its input. An error is cleared as soon as
    /// the value becomes valid, but never raised here.
    pub fn input(&mut self, field: Field, raw: &str) -> String {
        let value = match field {
            Field::Phone => format_phone(raw),
            _ => raw.to_string(),
        };

        if self.has_error(field) && field.accepts(&value) {
            self.set_error(field, false);
        }

        *self.values.slot(field) = value.clone();
        value
    }

    /// Replaces the stored values with what the page's controls hold right now,
    /// without reformatting or touching error marks.
    pub fn capture(&mut self, snapshot: FormSnapshot) {
        self.values = snapshot;
    }

    pub fn capture_field(&mut self, field: Field, value: String) {
        *self.values.slot(field) = value;
    }

    pub fn begin_submit(&mut self) -> SubmitDecision {
        if self.is_submitting() {
            return SubmitDecision::Busy;
        }

        let snapshot = self.values.clone();
        for field in Field::ALL {
            let valid = field.accepts(snapshot.get(field));
            self.set_error(field, !valid);
        }

        if let Some(first) = Field::ALL.into_iter().find(|f| self.has_error(*f)) {
            return SubmitDecision::Invalid { first };
        }

        self.phase = SubmissionPhase::Submitting;
        SubmitDecision::Accepted(snapshot)
    }

    /// Always returns the control to `Idle`. On success the fields are cleared
    /// and the success banner is shown.
    pub fn finish_submit(&mut self, result: Result<(), SubmitError>) -> SubmissionOutcome {
        self.phase = SubmissionPhase::Idle;

        match result {
            Ok(()) => {
                self.values = FormSnapshot::default();
                self.errors = [false; 5];
                self.success = SuccessBanner {
                    created: true,
                    visible: true,
                };
                SubmissionOutcome::Succeeded
            }
            Err(e) => SubmissionOutcome::Failed(e.to_string()),
        }
    }

    pub fn hide_success(&mut self) {
        self.success.visible = false;
    }
}
