//! # KOPIS CLI
//!
//! 虚拟 Orange Pi 3 LTS 的命令行工具。
//!
//! ```bash
//! # 配置两个引脚后查看引脚表
//! kopis table --setup 12:OUT:1 --setup 19:ALT
//!
//! # GPIO / 电机演示
//! kopis demo gpio --delay-ms 0
//! kopis demo motors
//!
//! # 执行 JSON 脚本
//! kopis run --script blink.json --continue-on-error
//!
//! # 配置管理
//! kopis config set mount.polar_elevation_deg 55
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod script;
mod validation;

use commands::config::config_file;
use commands::{CliConfig, ConfigCommand, DemoCommand, RunCommand, TableCommand};

/// KOPIS CLI - 虚拟开发板命令行工具
#[derive(Parser, Debug)]
#[command(name = "kopis")]
#[command(about = "Command-line interface for the KOPIS virtual board", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认: $KOPIS_CONFIG 或 <config_dir>/kopis/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 打印引脚表
    Table {
        #[command(flatten)]
        args: TableCommand,
    },

    /// 运行演示程序
    #[command(subcommand)]
    Demo(DemoCommand),

    /// 执行脚本
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    kopis_sdk::init_logger();

    let cli = Cli::parse();
    let config_path = config_file(cli.config.as_deref())?;
    tracing::debug!(path = %config_path.display(), "using config file");

    match cli.command {
        Commands::Table { args } => args.execute().await,

        Commands::Demo(cmd) => {
            let config = CliConfig::load(&config_path)?;
            cmd.execute(&config).await
        },

        Commands::Run { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(&config).await
        },

        Commands::Config(cmd) => cmd.execute(&config_path).await,
    }
}
