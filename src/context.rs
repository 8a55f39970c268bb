//! Checked access to values that extenders put in the request context.
//!
//! Context structs hold extender-provided values as `Option<T>` fields so a
//! fresh `Default` context is always valid. A stage that needs the value calls
//! [`Require::require`], which turns a missing value into a 500 instead of a
//! panic: the route was assembled without the extender it depends on.

use crate::error::HttpError;

pub trait Require<T> {
    /// Borrow the value or fail with `missing context value: <name>` (500).
    fn require(&self, name: &str) -> Result<&T, HttpError>;
}

impl<T> Require<T> for Option<T> {
    fn require(&self, name: &str) -> Result<&T, HttpError> {
        self.as_ref()
            .ok_or_else(|| HttpError::internal(format!("missing context value: {name}")))
    }
}
