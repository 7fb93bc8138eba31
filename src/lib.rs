pub mod backend;
pub mod catalog;
pub mod config;
pub mod guidelines;
pub mod logging;
pub mod output;
pub mod questionnaire;
pub mod report;
pub mod results;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
