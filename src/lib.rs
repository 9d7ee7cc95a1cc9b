//! cuesync - Subtitle Synchronization
//!
//! Aligns a block of translated text with the speech segments reported by a
//! transcriber, producing ordered, non-overlapping SRT cues.

pub mod cli;
pub mod config;
pub mod error;
pub mod subtitle;
pub mod sync;
pub mod timestamp;
pub mod transcript;
pub mod workflow;

pub use error::{CuesyncError, Result};
pub use subtitle::{Cue, CueSequence};
pub use sync::{Diagnostic, Segment, SyncOutcome, SyncStrategy, synchronize};
