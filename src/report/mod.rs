//! Report rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_line, generate_markdown_report, RenderOptions};
