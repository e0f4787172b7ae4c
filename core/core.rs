pub mod block;
pub mod category;
pub mod classify;
pub mod collect;
pub mod config;
pub mod emit;
pub mod error;
pub mod report;
pub mod tree;

pub use block::{FileBlock, format_block, split_blocks};
pub use category::{Category, Discovery, categories};
pub use collect::{Candidate, SkipReason, collect, probe};
pub use config::Config;
pub use emit::{Emitter, OutputSession, RunSummary, run, run_with_categories};
pub use error::{AppError, Result};
pub use report::{ConsoleReporter, NullReporter, ProgressReporter};
pub use tree::{FlatListing, TreeCommand, TreeRenderer, TreeUnavailable, select_renderer};
