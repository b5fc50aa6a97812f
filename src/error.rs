//! Error types for the synthesis engine and its CLI driver.

use thiserror::Error;

/// Errors raised while learning or ranking a program. These are distinct
/// from the "no program found" outcome (an empty [`crate::dag::Dag`] or
/// empty path list), which is not an error: it is the ordinary result of
/// an intersection that eliminates every candidate.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("no examples were provided")]
    NoExamples,

    #[error("intersected DAG grew to {edges} edges, exceeding the configured limit of {limit}")]
    DagTooLarge { edges: usize, limit: usize },

    #[error("failed to compile regex fragment `{fragment}`: {source}")]
    RegexCompile {
        fragment: String,
        #[source]
        source: fancy_regex::Error,
    },
}

/// Errors belonging to the CLI collaborator (spec.md assigns malformed
/// input and I/O failures to the driver, not the core algebra).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("malformed example line (expected exactly one comma): {line:?}")]
    MalformedExample { line: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}
