//! Pair-matching game core.
//!
//! A collection of face-down items is revealed two at a time; matching pairs
//! are removed, mismatches flash until the next move, and the game ends when
//! every pair is found. This crate holds the state machine behind that:
//! selection and match resolution, the unselect queue, keyboard focus
//! traversal, completion scoring, and the responsive grid scaler, together
//! with the terminal adapters used by the demos, benches, and tests.

pub mod config;
pub mod error;
pub mod focus;
pub mod game;
pub mod item;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod popup;
pub mod queue;
pub mod render;
pub mod runtime;
pub mod scheduler;
pub mod timer;
pub mod view;

pub use config::{FaceSource, GamePrefs, ImageRef, Labels, PairDescriptor, RosterArrangement};
pub use error::{GameError, Result};
pub use focus::NavCommand;
pub use game::{Game, GameEvent, TurnCounter};
pub use item::{Item, ItemId, Payload};
pub use layout::{GridScaler, GridSpec};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{GameMetrics, MetricSnapshot};
pub use popup::{FeedbackPopup, FeedbackRequest, NullPopup};
pub use queue::UnselectQueue;
pub use render::{CellRenderer, RendererSettings};
pub use runtime::{GameRuntime, RuntimeConfig, RuntimeEvent, format_elapsed};
pub use scheduler::{GameTask, TaskScheduler};
pub use timer::{ManualTimer, SessionTimer, Timer};
pub use view::{ViewRegistry, compose_cell};
