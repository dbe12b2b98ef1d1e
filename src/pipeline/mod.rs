//! Pipeline entry points for crawler operations.
//!
//! - `Engine::run`: search, download and validate every term of a list
//! - `Engine::retry`: second pass over the failures of a run
//! - `ItemPipeline::process`: the same for a single term

mod batch;
mod item;
mod observer;
mod pacing;

pub use batch::{Engine, RunState};
pub use item::{ItemOutcome, ItemPipeline};
pub use observer::{
    ChannelObserver, LogObserver, NoopObserver, Phase, ProgressEvent, ProgressObserver,
};
pub use pacing::Pacer;
