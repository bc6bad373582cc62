//! Render module orchestrator following the RSB module specification.

mod core;

pub use core::{CellRenderer, RendererSettings, visible_width};
