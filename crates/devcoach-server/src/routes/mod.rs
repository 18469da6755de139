pub mod analytics;
pub mod coaching;
pub mod config;
pub mod github;
pub mod health;
pub mod queue;
