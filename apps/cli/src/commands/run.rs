//! run 命令
//!
//! 执行脚本文件

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::config::CliConfig;
use crate::script::{ScriptConfig, ScriptExecutor, ScriptResult};
use crate::validation::PathValidator;

/// 脚本执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 脚本文件路径
    #[arg(short, long)]
    pub script: PathBuf,

    /// 失败时继续执行（覆盖配置）
    #[arg(long)]
    pub continue_on_error: bool,
}

impl RunCommand {
    /// 执行脚本
    ///
    /// 有命令失败时返回错误，进程以非 0 退出。
    pub async fn execute(&self, config: &CliConfig) -> Result<()> {
        PathValidator::new().must_exist().validate_path(&self.script)?;
        println!("📜 加载脚本: {}", self.script.display());

        let script = ScriptExecutor::load_script(&self.script)?;

        println!("📋 脚本: {}", script.name);
        if !script.description.is_empty() {
            println!("    {}", script.description);
        }
        println!("    {} 个命令", script.commands.len());
        println!();

        let script_config = ScriptConfig {
            continue_on_error: self.continue_on_error || config.script.continue_on_error,
            execution_delay_ms: 0,
        };
        let mut executor = ScriptExecutor::new(config.build_gpio()?).with_config(script_config);

        let result = executor.execute(&script).await?;
        print_summary(&result);

        if !result.failed.is_empty() {
            anyhow::bail!("脚本 {} 有 {} 个命令失败", result.script_name, result.failed.len());
        }
        Ok(())
    }
}

fn print_summary(result: &ScriptResult) {
    println!();
    println!("📊 执行结果:");
    println!("  总命令数: {}", result.total_commands);
    println!("  成功: {}", result.succeeded.len());
    println!("  失败: {}", result.failed.len());
    if result.skipped() > 0 {
        println!("  未执行: {}", result.skipped());
    }
    println!("  耗时: {:.2} 秒", result.duration_secs);

    if !result.failed.is_empty() {
        println!();
        println!("❌ 失败的命令:");
        for (idx, err) in &result.failed {
            println!("  命令 {}: {}", idx + 1, err);
        }
    }
}
