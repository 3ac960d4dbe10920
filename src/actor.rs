pub mod core;
pub mod dispatch;
pub mod flow;
pub mod message;
pub mod pid;
pub mod process_registry;
pub mod scheduler;

mod config;
mod config_option;
mod dead_letter_process;


pub use {self::config::*, self::config_option::*, self::dead_letter_process::*};
