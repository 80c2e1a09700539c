//! Configuration for the optimization core.

/// Tunable switches for the optimization components.
///
/// Defaults enable everything; the enclosing driver narrows the configuration
/// from its own settings.
#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    /// Whether field-access references may be generalized to a more general
    /// declaring class.
    pub generalize_field_refs: bool,
    /// Whether virtual-call references may be generalized to a more general
    /// declaring class.
    pub generalize_method_refs: bool,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            generalize_field_refs: true,
            generalize_method_refs: true,
        }
    }
}

impl OptimizeConfig {
    /// Sets whether field-access references may be generalized.
    #[must_use]
    pub fn with_generalize_field_refs(mut self, enabled: bool) -> Self {
        self.generalize_field_refs = enabled;
        self
    }

    /// Sets whether virtual-call references may be generalized.
    #[must_use]
    pub fn with_generalize_method_refs(mut self, enabled: bool) -> Self {
        self.generalize_method_refs = enabled;
        self
    }
}
