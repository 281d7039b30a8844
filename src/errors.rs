use thiserror::Error;

/// Fatal error kinds for a tagging run.
///
/// Configuration problems (`FieldIndexOutOfRange`) are reported distinctly
/// from bad input data (`MalformedWhitelist`, `MalformedRecord`): the former
/// means the caller's options do not match the identifier format, the latter
/// means a specific line or record is broken. Nothing is retried; every
/// variant aborts the run.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TagError {
    #[error("malformed whitelist: line {line} has fewer than two tab-separated columns")]
    MalformedWhitelist { line: usize },

    #[error("malformed record '{name}': {reason}")]
    MalformedRecord { name: String, reason: String },

    #[error(
        "configuration error: {which} field index {index} is out of range for \
         record '{name}' ({available} fields after splitting)"
    )]
    FieldIndexOutOfRange {
        which: &'static str,
        index: usize,
        available: usize,
        name: String,
    },
}
