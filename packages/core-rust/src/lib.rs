//! Lookup Core — uniform dynamic-call dispatch over a partner directory and a
//! value-mapping table.
//!
//! Callers hand a resolver a key (a scalar or an ordered sequence of scalars);
//! the resolver normalizes it into tokens, picks an operation from a closed
//! registry, checks arity against its binding context, calls the backing
//! service, and returns a [`Resolution`]. Errors are values: no failure
//! crosses [`Resolver::resolve`].

pub mod context;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod mapping;
pub mod registry;
pub mod tokens;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{MappingBinding, PartnerBinding};
pub use directory::DirectoryResolver;
pub use dispatch::{Resolution, Resolver};
pub use error::{DispatchError, ErrorKind, ServiceError};
pub use mapping::MappingResolver;
pub use registry::{OperationDescriptor, OperationRegistry};
pub use tokens::{normalize, TokenSequence};
pub use traits::{PartnerDirectory, ValueMapping};
pub use types::{ContentType, ParameterKind, ParameterValue, Payload, Value};
