/// Errors raised while building or extending a rule table.
///
/// Evaluation itself never fails; these only surface when rules are loaded
/// from configuration.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A rule was declared with an empty (or whitespace-only) pattern.
    #[error("empty rule pattern for category '{category}'")]
    EmptyPattern {
        /// The category the rule was meant to belong to.
        category: String,
    },

    /// A rule pattern is already present in the table.
    #[error("duplicate rule pattern '{pattern}'")]
    DuplicatePattern {
        /// The normalized pattern that collided.
        pattern: String,
    },
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
