//! Non-fatal issues reported while configuring forces.
//!
//! Every issue is logged through `tracing` when reported and kept around so
//! the caller can decide whether to escalate it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A coefficient is set for a type but no force field uses it.
    UnknownCoefficient { type_name: String, coeff: String },
    /// `set` was called without any named values.
    EmptyCoefficientCall { types: Vec<String> },
    /// A registered particle type lacks required coefficients.
    MissingCoefficients {
        type_name: String,
        missing: Vec<String>,
    },
    /// `enable`/`disable` on a handle already in that state.
    RedundantToggle { handle: String, enabled: bool },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MissingCoefficients { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    fn emit(&self) {
        match self.severity() {
            Severity::Warning => tracing::warn!(target: "diagnostics", "{self}"),
            Severity::Error => tracing::error!(target: "diagnostics", "{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownCoefficient { type_name, coeff } => write!(
                f,
                "possible typo? coefficient '{coeff}' is specified for type '{type_name}' but is not used by the force"
            ),
            Diagnostic::EmptyCoefficientCall { types } => {
                write!(f, "no coefficients specified for types {types:?}")
            }
            Diagnostic::MissingCoefficients { type_name, missing } => write!(
                f,
                "particle type '{type_name}' is missing required coefficients {missing:?}"
            ),
            Diagnostic::RedundantToggle { handle, enabled } => {
                let state = if *enabled { "enabled" } else { "disabled" };
                write!(f, "ignoring request: {handle} is already {state}")
            }
        }
    }
}

/// Accumulates reported diagnostics in order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, issue: Diagnostic) {
        issue.emit();
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Diagnostic>) {
        for issue in issues {
            self.report(issue);
        }
    }

    pub fn issues(&self) -> &[Diagnostic] {
        &self.issues
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.issues)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|d| d.severity() == Severity::Error)
    }
}
