//! Template handler — one instance per configured template, registered under
//! the template's name as scheme.

use async_trait::async_trait;

use nexus_domain::action::Action;
use nexus_domain::error::{CatalogError, ResolveError};
use nexus_domain::template::{CompiledTemplate, Template};

use crate::ports::ContinuingHandler;

/// Rewrites `<name>:<ssp>` by matching `ssp` against a template pattern.
#[derive(Debug)]
pub struct TemplateHandler {
    name: String,
    template: CompiledTemplate,
}

impl TemplateHandler {
    /// Compile `definition` for the scheme `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidTemplate`] when the pattern is unusable.
    pub fn new(name: impl Into<String>, definition: Template) -> Result<Self, CatalogError> {
        let name = name.into();
        let template = CompiledTemplate::compile(&name, definition)?;
        Ok(Self { name, template })
    }
}

#[async_trait]
impl ContinuingHandler for TemplateHandler {
    async fn handle(&self, action: &Action) -> Result<Option<Action>, ResolveError> {
        let ssp = action.scheme_specific_part();
        let captures =
            self.template
                .captures(ssp)
                .ok_or_else(|| ResolveError::TemplateMismatch {
                    input: action.target.to_string(),
                    template: self.template.pattern().to_string(),
                })?;
        self.template
            .render(&captures)
            .map(Some)
            .map_err(|err| ResolveError::malformed(&self.name, ssp, err.to_string()))
    }
}
