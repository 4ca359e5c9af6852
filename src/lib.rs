// Clippy allows for reasonable defaults
// These suppress warnings where the suggested change doesn't improve readability
#![allow(clippy::too_many_arguments)] // Workflow helpers thread several clients
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::single_char_add_str)] // push_str("\n") reads better than push('\n')
#![allow(async_fn_in_trait)] // Traits are consumed via generics, not trait objects

// Module declarations
pub mod config;
pub mod debate;
pub mod error;
pub mod financials;
pub mod llm;
pub mod prompts;
pub mod research;
pub mod search;
pub mod sheets;
pub mod store;

// Server module (HTTP API)
pub mod server;
