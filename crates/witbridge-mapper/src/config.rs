//! Configuration for schema derivation.

/// How plain variant cases are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseNaming {
    /// `{union-name}{i}` for named unions, `case{i}` for anonymous ones.
    #[default]
    FromUnionName,
    /// Always `case{i}`.
    Ordinal,
}

/// Configuration for the type mapper.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapperConfig {
    /// Naming of plain variant cases
    pub(crate) case_naming: CaseNaming,
    /// Owner recorded on every named composite
    pub(crate) owner: Option<String>,
}

impl MapperConfig {
    /// Create a new MapperConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how plain variant cases are named.
    pub fn case_naming(mut self, value: CaseNaming) -> Self {
        self.case_naming = value;
        self
    }

    /// Set the owner (package or interface) recorded on named composites.
    pub fn owner(mut self, value: impl Into<String>) -> Self {
        self.owner = Some(value.into());
        self
    }
}
