pub mod catalog;
pub mod config;
pub mod engine;
pub mod filters;
pub mod form;
pub mod logging;
pub mod prompt;
pub mod report;
pub mod session;
pub mod tables;
