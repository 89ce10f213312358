pub mod config;
pub mod console;
pub mod decode;
pub mod error;
pub mod generator;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod rating;
pub mod readability;
pub mod report;
pub mod segments;
pub mod sentiment;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;
