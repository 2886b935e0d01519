pub mod config;
pub mod insights;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod seed;
pub mod session;
pub mod stderr_buffer;
pub mod tui;
pub mod usecase;
