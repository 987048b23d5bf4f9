pub mod artifacts;
pub mod catalog;
pub mod client;
pub mod content;
pub mod session;
pub mod types;
