//! Token sequence normalization: converts a host [`Value`] key into the flat
//! ordered list of strings that every resolver dispatches on.

use std::ops::Deref;

use crate::error::DispatchError;
use crate::types::Value;

/// Non-empty ordered sequence of string tokens derived from one call's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence(Vec<String>);

impl TokenSequence {
    /// First token. Always present: construction rejects empty sequences.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// Tokens after the first one.
    #[must_use]
    pub fn tail(&self) -> &[String] {
        &self.0[1..]
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for TokenSequence {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for TokenSequence {
    type Error = DispatchError;

    fn try_from(tokens: Vec<String>) -> Result<Self, DispatchError> {
        if tokens.is_empty() {
            return Err(DispatchError::EmptySequence);
        }
        Ok(Self(tokens))
    }
}

/// Normalize a host key into a token sequence.
///
/// - `Null` fails with [`DispatchError::NullInput`].
/// - A scalar yields a one-element sequence.
/// - An array yields one token per element, in order. Every element must be
///   scalar-like; a nested collection makes the whole key unsupported.
/// - Any other shape fails with [`DispatchError::UnsupportedInputType`].
/// - A sequence that ends up empty fails with [`DispatchError::EmptySequence`].
///
/// # Errors
///
/// Returns the `DispatchError` describing why `key` has no token form.
pub fn normalize(key: &Value) -> Result<TokenSequence, DispatchError> {
    let tokens = match key {
        Value::Null => return Err(DispatchError::NullInput),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_token().ok_or(DispatchError::UnsupportedInputType {
                    type_name: item.type_name(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        scalar => match scalar.as_token() {
            Some(token) => vec![token],
            None => {
                return Err(DispatchError::UnsupportedInputType {
                    type_name: scalar.type_name(),
                })
            }
        },
    };
    TokenSequence::try_from(tokens)
}
