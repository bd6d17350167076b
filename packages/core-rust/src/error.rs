//! Error taxonomy for the dispatch boundary.
//!
//! Every failure a resolver can hit is a [`DispatchError`]. The variant is the
//! machine-checkable category (see [`ErrorKind`]); its `Display` output is the
//! sentence handed back to the caller in place of a value.

/// Category of a dispatch failure, independent of its rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullInput,
    UnsupportedInputType,
    EmptySequence,
    UnknownOperation,
    ArityMismatch,
    DownstreamServiceError,
}

/// A failure at any stage of a resolver call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("ERROR: Please, pass arguments as a sequence. Received null value")]
    NullInput,

    #[error("ERROR: Please, pass arguments as a sequence. Type received is {type_name}")]
    UnsupportedInputType { type_name: &'static str },

    #[error("ERROR: Empty sequence received")]
    EmptySequence,

    #[error(
        "ERROR: No method '{name}' exists. Use one of the followings: {}",
        quote_list(.valid)
    )]
    UnknownOperation {
        name: String,
        valid: Vec<&'static str>,
    },

    #[error(
        "ERROR: Wrong number of parameters for method '{operation}'. Add the following values after '{operation}': {}",
        .missing.join(", ")
    )]
    ArityMismatch {
        operation: &'static str,
        missing: Vec<&'static str>,
    },

    /// Token count that selects no shape-addressed operation.
    #[error("ERROR: Wrong number of values in sequence ({received}). {expected}")]
    TokenCount {
        received: usize,
        expected: &'static str,
    },

    #[error("ERROR: Exception calling method '{operation}' of {service}: {message}")]
    Downstream {
        service: &'static str,
        operation: &'static str,
        message: String,
    },
}

impl DispatchError {
    /// The failure category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NullInput => ErrorKind::NullInput,
            Self::UnsupportedInputType { .. } => ErrorKind::UnsupportedInputType,
            Self::EmptySequence => ErrorKind::EmptySequence,
            Self::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Self::ArityMismatch { .. } | Self::TokenCount { .. } => ErrorKind::ArityMismatch,
            Self::Downstream { .. } => ErrorKind::DownstreamServiceError,
        }
    }
}

/// Renders `["A", "B", "C"]` as `'A', 'B' or 'C'`.
fn quote_list(names: &[&'static str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

/// Failure reported by a backing collaborator (directory or mapping service).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
