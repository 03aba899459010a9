//! Emission driver: configuration check → build/unify → name → render.

use serde_json::Value;

use crate::codegen::{self, Backend};
use crate::config::Config;
use crate::error::ConfigError;
use crate::inference::Inference;
use crate::ir::TypeNode;
use crate::naming::{NamingWarning, Resolver};

#[derive(Debug, Clone)]
pub struct Conversion {
    /// Rendered declarations, newline-terminated.
    pub output: String,
    pub warnings: Vec<NamingWarning>,
}

/// Convert one JSON document. A root array is treated as a list of samples
/// of its element type; the array itself stays anonymous.
pub fn convert(value: &Value, config: &Config) -> Result<Conversion, ConfigError> {
    convert_all(std::iter::once(value), config)
}

/// Convert several documents that are all samples of the same root type.
pub fn convert_all<'a, I>(values: I, config: &Config) -> Result<Conversion, ConfigError>
where
    I: IntoIterator<Item = &'a Value>,
{
    let backend = check_config(config)?;

    let mut inf = Inference::new();
    for v in values {
        inf.observe_value(v);
    }
    tracing::debug!(samples = inf.samples(), backend = backend.name(), "inferred root type");
    Ok(render(&inf.into_solution(), config, backend))
}

/// Name and render an already inferred type graph.
pub fn render_type(root: &TypeNode, config: &Config) -> Result<Conversion, ConfigError> {
    let backend = check_config(config)?;
    Ok(render(root, config, backend))
}

/// Every configuration check, engine and backend. Conversions run it before
/// touching the input; callers that do I/O first can run it up front too.
pub fn check_config(config: &Config) -> Result<&'static dyn Backend, ConfigError> {
    config.validate()?;
    let backend = codegen::lookup(&config.target_language)?;
    backend.validate(config)?;
    Ok(backend)
}

fn render(root: &TypeNode, config: &Config, backend: &dyn Backend) -> Conversion {
    let resolved = Resolver::new(config.naming_convention, backend)
        .share_identical_types(config.share_identical_types)
        .resolve(root, &config.root_name);
    tracing::debug!(
        declarations = resolved.graph.declarations.len(),
        warnings = resolved.warnings.len(),
        "resolved names"
    );
    Conversion {
        output: backend.render(&resolved.graph, config),
        warnings: resolved.warnings,
    }
}
