pub mod auth;
pub mod dashboard;
pub mod project;
pub mod spec;
pub mod team;
pub mod upload;
