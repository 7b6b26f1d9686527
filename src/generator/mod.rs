pub mod agents;
pub mod context;
pub mod outlet;
pub mod prompts;
pub mod score;
pub mod types;
pub mod workflow;
