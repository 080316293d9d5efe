//! Interception errors.
//!
//! A blocked install is not an error: it is reported as `Ok(false)`.

use crate::mode::SwizzleMode;
use swizzle_runtime::{DispatchError, Selector};
use thiserror::Error;

/// Errors raised by the installer. None of them leave state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterceptError {
    /// The selector resolves nowhere in the class or its ancestors.
    #[error("cannot intercept '{selector}' on '{class}': not implemented by it or its ancestors")]
    MessageNotFound { class: String, selector: Selector },

    /// A keyed mode was requested without a key.
    #[error("mode '{mode}' needs a key")]
    MissingKey { mode: SwizzleMode },

    /// Class-side interception was requested on a metaclass.
    #[error("'{class}' is a metaclass and has no class-side methods of its own")]
    NoMetaclass { class: String },

    /// The receiver value has no dispatch class.
    #[error("cannot intercept methods of a {kind} value")]
    NotAReceiver { kind: &'static str },
}

/// Result type for interception operations.
pub type InterceptResult<T> = Result<T, InterceptError>;

impl From<DispatchError> for InterceptError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::MessageNotFound { class, selector } => {
                InterceptError::MessageNotFound { class, selector }
            }
            DispatchError::NotAReceiver { kind } => InterceptError::NotAReceiver { kind },
        }
    }
}
