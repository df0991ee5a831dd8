pub mod ops;
pub mod prompts;
pub mod types;
