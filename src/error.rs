use thiserror::Error;

use crate::Label;

/// The error type for registry operations.
///
/// Every failing operation leaves the registry unchanged; callers decide
/// whether to retry with different arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A position outside `[-len, len)` was passed to [`label_at`].
    ///
    /// [`label_at`]: crate::LabelRegistry::label_at
    #[error("position {position} is out of range for a registry of {len} variables")]
    OutOfRange {
        /// The offending position, as passed in (possibly negative).
        position: i64,
        /// The number of variables at the time of the call.
        len: usize,
    },

    /// The label does not denote a live variable.
    #[error("unknown variable {0:?}")]
    UnknownVariable(Label),

    /// Inserting or renaming to this label would duplicate a live label.
    #[error("duplicate label {0:?}")]
    DuplicateLabel(Label),

    /// [`pop`] was called on a registry with no variables.
    ///
    /// [`pop`]: crate::LabelRegistry::pop
    #[error("cannot pop from an empty registry")]
    EmptyRegistry,
}
