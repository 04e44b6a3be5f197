use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, MarqueeError>;

/// Everything that can go wrong before or while the scroller runs.
///
/// Probe failures are deliberately absent: a command that exits non-zero
/// or cannot be spawned is "no output", not an error (see
/// [`crate::probe::Probe`]).
#[derive(Debug, Error)]
pub enum MarqueeError {
    /// Writing a frame to the output sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The number of match commands can only be 1 (broadcast to every
    /// rule) or equal to the number of match rules.
    #[error(
        "number of match commands must be 1 or match the number of match rules \
         (got {commands} commands for {rules} rules)"
    )]
    MatchCountMismatch { commands: usize, rules: usize },

    /// A match rule's pattern failed to compile.
    #[error("invalid match pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex_lite::Error,
    },

    /// A match rule's option-override fragment failed to parse.
    #[error("invalid match options {fragment:?}: {message}")]
    InvalidOverride { fragment: String, message: String },

    /// A duration option was negative or not a number.
    #[error("{option} must be a non-negative number of seconds (got {value})")]
    InvalidDuration { option: &'static str, value: f64 },

    /// No scroll text was given and stdin is a terminal.
    #[error("no text to scroll; pass it as an argument or pipe it on stdin")]
    MissingText,
}
