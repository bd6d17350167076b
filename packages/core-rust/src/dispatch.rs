//! Shared dispatch machinery used by every resolver.
//!
//! A resolver call runs: normalize key -> resolve operation -> check arity
//! (accounting for the binding context) -> invoke handler -> shape result.
//! Any failure short-circuits into [`Resolution::Error`]; nothing escapes
//! [`Resolver::resolve`] as a panic or a `Result::Err`.

use std::fmt;

use tracing::warn;

use crate::error::{DispatchError, ServiceError};
use crate::registry::OperationDescriptor;
use crate::types::{Payload, Value};

/// Outcome of one resolver call.
#[derive(Debug, Clone)]
pub enum Resolution<R> {
    /// A plain value.
    Value(Payload),
    /// A new resolver carrying a binding context.
    Bound(R),
    /// The call failed; the error renders as the caller-visible sentence.
    Error(DispatchError),
}

impl<R> Resolution<R> {
    /// Collapse an internal dispatch result into a resolution.
    pub fn from_result(result: Result<Self, DispatchError>) -> Self {
        result.unwrap_or_else(Self::Error)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&Payload> {
        match self {
            Self::Value(payload) => Some(payload),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_bound(self) -> Option<R> {
        match self {
            Self::Bound(resolver) => Some(resolver),
            _ => None,
        }
    }
}

/// Single entry point of the dynamic call protocol.
///
/// `resolve` takes a scalar or a sequence of scalars and never fails: errors
/// come back as [`Resolution::Error`]. Bound handles are themselves
/// resolvers of the same type.
pub trait Resolver: Clone + fmt::Display + Send + Sync + Sized {
    /// Name of the backing service, used in downstream error messages.
    const SERVICE: &'static str;

    fn resolve(&self, key: &Value) -> Resolution<Self>;

    /// Whether this instance carries a binding context.
    fn is_bound(&self) -> bool;
}

/// Validate that `supplied` positional tokens satisfy `op`.
///
/// When the resolver is unbound and the operation takes a context-suppliable
/// leading parameter, that parameter counts as one more required token and is
/// listed first in the error.
pub(crate) fn check_arity<H>(
    op: &OperationDescriptor<H>,
    supplied: usize,
    bound: bool,
) -> Result<(), DispatchError> {
    let leading = op.bound_param.filter(|_| !bound);
    let required = op.min_args + usize::from(leading.is_some());
    if supplied >= required {
        return Ok(());
    }
    Err(DispatchError::ArityMismatch {
        operation: op.name,
        missing: leading.into_iter().chain(op.param_names.iter().copied()).collect(),
    })
}

/// Convert a backing-service failure into a dispatch error for `operation`.
pub(crate) fn downstream(
    service: &'static str,
    operation: &'static str,
) -> impl FnOnce(ServiceError) -> DispatchError {
    move |err| {
        warn!(service, operation, error = %err, "backing service call failed");
        DispatchError::Downstream {
            service,
            operation,
            message: err.message,
        }
    }
}

/// Payload for an optional text value returned by a backing service.
pub(crate) fn text_or_empty(value: Option<String>) -> Payload {
    value.map_or(Payload::Empty, Payload::Text)
}
