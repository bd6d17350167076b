//! Closed operation tables.
//!
//! Each resolver owns one [`OperationRegistry`] built once from a static
//! slice of [`OperationDescriptor`]s. Lookup is exact but case-insensitive;
//! the table offers no insertion or removal.

use std::collections::HashMap;

use crate::error::DispatchError;

/// Immutable description of one dispatchable operation.
#[derive(Debug)]
pub struct OperationDescriptor<H: 'static> {
    /// Canonical name, as shown in error messages.
    pub name: &'static str,
    /// Minimum number of positional arguments after any context-supplied one.
    pub min_args: usize,
    /// Human-readable parameter names, in call order.
    pub param_names: &'static [&'static str],
    /// Leading parameter a binding context can supply (e.g. `partnerId`).
    /// When the resolver is unbound the caller must pass it explicitly.
    pub bound_param: Option<&'static str>,
    /// Implementation invoked with the validated arguments.
    pub handler: H,
}

/// Read-only, case-insensitive index over a static operation table.
#[derive(Debug)]
pub struct OperationRegistry<H: 'static> {
    operations: &'static [OperationDescriptor<H>],
    by_name: HashMap<String, usize>,
}

impl<H> OperationRegistry<H> {
    /// Index `operations` by upper-cased name.
    ///
    /// Later duplicates are ignored; tables are expected to have unique names.
    #[must_use]
    pub fn new(operations: &'static [OperationDescriptor<H>]) -> Self {
        let mut by_name = HashMap::with_capacity(operations.len());
        for (idx, op) in operations.iter().enumerate() {
            by_name.entry(op.name.to_ascii_uppercase()).or_insert(idx);
        }
        Self {
            operations,
            by_name,
        }
    }

    /// Resolve an operation by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownOperation`] naming `name` and listing
    /// every registered operation.
    pub fn lookup(&self, name: &str) -> Result<&'static OperationDescriptor<H>, DispatchError> {
        let operations = self.operations;
        self.by_name
            .get(&name.to_ascii_uppercase())
            .map(|&idx| &operations[idx])
            .ok_or_else(|| DispatchError::UnknownOperation {
                name: name.to_string(),
                valid: self.names(),
            })
    }

    /// Canonical names of all operations, in table order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static OperationDescriptor<H>> {
        self.operations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
