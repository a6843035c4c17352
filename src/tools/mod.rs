//! Tool infrastructure — catalog, parameter validation, result envelope.
//!
//! Pure data: nothing here performs I/O. The gateway consumes the catalog to
//! resolve and validate calls, and produces [`ToolResult`] envelopes.

pub mod catalog;
pub mod result;

pub use catalog::{ParamDef, ParamType, Tool, ToolCatalog, ToolEntry};
pub use result::{ToolContent, ToolResult};
