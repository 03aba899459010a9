//! Infer a type graph from JSON samples and render it as type declarations
//! for C#, TypeScript, Python or Rust.
//!
//! ```ignore
//! let conv = json2type::convert(&value, &json2type::Config::new().target_language("ts"))?;
//! print!("{}", conv.output);
//! ```
pub mod codegen;
pub mod config;
pub mod driver;
pub mod error;
pub mod inference;
pub mod ir;
pub mod naming;
pub mod path_de;

pub use config::{Config, DeclarationKind, NamingConvention, NestedTypeStyle};
pub use driver::{check_config, convert, convert_all, render_type, Conversion};
pub use error::ConfigError;
pub use ir::TypeNode;
pub use naming::{NamingWarning, WarningReason};
