//! Layout module orchestrator following the RSB module specification.
//!
//! Downstream code imports layout types from here while the implementation
//! details live in the private `core` module.

mod core;

pub use core::{GridScaler, GridSpec, ITEM_MIN_SIZE, ITEM_STD_SIZE, LIST_PADDING, STD_FONT_SIZE};
