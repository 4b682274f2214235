mod cache;
mod classifier;
mod config;
mod db;
mod error;
mod event;
mod filter;
mod literal;
mod parser;
mod parser_data;
mod projector;
mod substitution;
mod types;

pub use cache::{CacheStats, ResultCache, DEFAULT_CACHE_SIZE};
pub use classifier::{Classify, UserAgentParser};
pub use config::FilterConfig;
pub use error::{Error, Result};
pub use event::Event;
pub use filter::{FilterOutcome, UserAgentFilter};
pub use projector::{project, Projection};
pub use types::*;
