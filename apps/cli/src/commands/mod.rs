//! 命令定义和实现

pub mod config;
pub mod demo;
pub mod run;
pub mod table;

pub use config::{CliConfig, ConfigCommand};
pub use demo::DemoCommand;
pub use run::RunCommand;
pub use table::TableCommand;
