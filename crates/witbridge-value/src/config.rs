//! Configuration for value conversion.

/// Configuration for the serializer.
#[derive(Clone, Debug, Default)]
pub struct ConvertConfig {
    /// Fill missing non-optional primitive fields with their zero value
    pub(crate) implicit_defaults: bool,
}

impl ConvertConfig {
    /// Create a new ConvertConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether a record field missing from the host object is filled with its zero
    /// value (`""`, `0`, `false`, `0n`) instead of failing with a missing-field error.
    ///
    /// Only `string`, `number`, `boolean` and `bigint` fields are filled. Off by default.
    pub fn implicit_defaults(mut self, value: bool) -> Self {
        self.implicit_defaults = value;
        self
    }
}
