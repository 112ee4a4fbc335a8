pub mod client;
pub mod matcher;
pub mod prompts;
pub mod types;

pub use client::*;
pub use matcher::*;
pub use types::*;
