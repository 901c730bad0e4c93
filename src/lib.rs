pub mod api;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod identity;
pub mod mutation;
pub mod types;
pub mod viewer;
