pub mod command;
pub mod output;
pub mod progress;
