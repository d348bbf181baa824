//! Fatal errors raised by the control layer.
//!
//! Anything that lands here aborts the current script call. Conditions that
//! should only be reported and then ignored are [`Diagnostic`](crate::diagnostics::Diagnostic)s.

use thiserror::Error;

use crate::core::ids::HandleId;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A coefficient, validation or handle call was made before the
    /// simulation context received its particle data.
    #[error("cannot {0} before the simulation is initialized")]
    Uninitialized(&'static str),

    #[error("the simulation context is already initialized")]
    AlreadyInitialized,

    /// `update_coeffs` found particle types with required coefficients unset.
    #[error("{handle}: not all force coefficients are set (missing for types {types:?})")]
    MissingCoefficients { handle: String, types: Vec<String> },

    /// Lookup of a particle type that has no coefficient entry.
    #[error("no coefficients have been set for particle type '{0}'")]
    UnknownType(String),

    /// A coefficient was read that was never set and has no default.
    #[error("coefficient '{coeff}' is undefined for particle type '{type_name}'")]
    UndefinedCoefficient { type_name: String, coeff: String },

    /// A coefficient value does not fit the kind its field declares.
    #[error("coefficient '{coeff}' for particle type '{type_name}' must be {expected}")]
    CoefficientKind {
        type_name: String,
        coeff: String,
        expected: &'static str,
    },

    /// The native reference of a handle is unset. This is a construction
    /// bug, never a user error.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// A format-constrained handle refused a configuration change.
    #[error("immutable configuration: {0}")]
    ImmutableConfiguration(String),

    #[error("no live handle with id {0}")]
    UnknownHandle(HandleId),

    #[error("handle {id} is not a {expected}")]
    HandleKind { id: HandleId, expected: &'static str },

    #[error("particle type index {index} out of range for {count} types")]
    TypeIndexOutOfRange { index: usize, count: usize },

    #[error("invalid particle data: {0}")]
    InvalidParticleData(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no script handle labelled '{0}'")]
    UnknownLabel(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that indicate a defect in this crate rather than in
    /// the calling script. These must abort, never be retried.
    pub fn is_bug(&self) -> bool {
        matches!(
            self,
            Error::InternalInvariant(_) | Error::UndefinedCoefficient { .. }
        )
    }
}
