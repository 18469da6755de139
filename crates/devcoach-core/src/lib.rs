pub mod coaching;
pub mod config;
pub mod error;
pub mod io;
pub mod normalize;
pub mod paths;
pub mod ratelimit;
pub mod rules;
pub mod scoring;
pub mod signals;
pub mod types;

pub use error::{CoachError, Result};
