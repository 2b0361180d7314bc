pub mod annotate;
pub mod parser;
pub mod runtime;
pub mod sanitize;
pub mod search;
pub mod server;
pub mod store;
pub mod types;

pub use parser::{parse_content, EquationInsert, ParseOptions, RenderContext};
