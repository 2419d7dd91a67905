//! 脚本系统
//!
//! JSON 脚本执行：通过脚本接口驱动虚拟装配体

use crate::validation::{MotionValidator, parse_level};
use anyhow::{Context, Result};
use kopis_sdk::gpio::{Channel, Direction, Gpio, MountType, Numbering};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::{Duration, Instant};

/// 脚本命令序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 命令序列
    pub commands: Vec<ScriptCommand>,
}

/// 脚本命令
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScriptCommand {
    /// 选择编号模式（BOARD / SOC）
    Numbering { mode: String },

    /// 配置通道方向（IN / OUT）
    Setup {
        channel: Channel,
        direction: String,
        #[serde(default)]
        initial: Option<String>,
    },

    /// 写电平
    Output { channel: Channel, level: String },

    /// 读电平（可选地与期望值比较）
    Input {
        channel: Channel,
        #[serde(default)]
        expect: Option<String>,
    },

    /// 释放一个或全部通道
    Cleanup {
        #[serde(default)]
        channel: Option<Channel>,
    },

    /// 分步转动电机
    Move {
        motor: String,
        degrees: f64,
        speed: f64,
    },

    /// 直接设置电机角度
    SetAngle { motor: String, degrees: f64 },

    /// 按支架类型初始化电机（EQ / AZ）
    Mount { mount_type: String },

    /// 等待
    Wait { duration_ms: u64 },

    /// 打印引脚表
    Table,
}

/// 脚本配置
#[derive(Debug, Clone, Default)]
pub struct ScriptConfig {
    /// 失败时是否继续
    pub continue_on_error: bool,

    /// 命令之间的延迟（毫秒）
    pub execution_delay_ms: u64,
}

/// 脚本执行结果
#[derive(Debug, Clone)]
pub struct ScriptResult {
    pub script_name: String,
    pub total_commands: usize,
    /// 成功的命令序号（从 0 开始）
    pub succeeded: Vec<usize>,
    /// 失败的命令序号与错误信息
    pub failed: Vec<(usize, String)>,
    pub duration_secs: f64,
}

impl ScriptResult {
    /// 是否有命令未执行（出错后停止）
    pub fn skipped(&self) -> usize {
        self.total_commands - self.succeeded.len() - self.failed.len()
    }
}

/// 脚本执行器
pub struct ScriptExecutor {
    gpio: Gpio,
    config: ScriptConfig,
}

impl ScriptExecutor {
    pub fn new(gpio: Gpio) -> Self {
        Self {
            gpio,
            config: ScriptConfig::default(),
        }
    }

    /// 设置配置
    pub fn with_config(mut self, config: ScriptConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gpio(&self) -> &Gpio {
        &self.gpio
    }

    /// 加载脚本文件
    pub fn load_script<P: AsRef<std::path::Path>>(path: P) -> Result<Script> {
        let content = fs::read_to_string(path).context("读取脚本文件失败")?;
        Self::parse_script(&content)
    }

    /// 解析脚本 JSON
    pub fn parse_script(content: &str) -> Result<Script> {
        serde_json::from_str(content).context("解析脚本 JSON 失败")
    }

    /// 执行脚本
    pub async fn execute(&mut self, script: &Script) -> Result<ScriptResult> {
        tracing::info!(script = %script.name, commands = script.commands.len(), "running script");
        let start = Instant::now();

        let mut result = ScriptResult {
            script_name: script.name.clone(),
            total_commands: script.commands.len(),
            succeeded: Vec::new(),
            failed: Vec::new(),
            duration_secs: 0.0,
        };

        for (i, cmd) in script.commands.iter().enumerate() {
            println!("命令 {}/{}:", i + 1, result.total_commands);

            match self.execute_command(cmd).await {
                Ok(()) => {
                    println!("  ✅ 成功");
                    result.succeeded.push(i);
                },

                Err(err) => {
                    println!("  ❌ 失败: {:#}", err);
                    result.failed.push((i, format!("{:#}", err)));

                    if !self.config.continue_on_error {
                        println!();
                        println!("❌ 脚本执行失败，停止执行");
                        break;
                    }
                },
            }

            if self.config.execution_delay_ms > 0 && i + 1 < script.commands.len() {
                tokio::time::sleep(Duration::from_millis(self.config.execution_delay_ms)).await;
            }
        }

        result.duration_secs = start.elapsed().as_secs_f64();
        Ok(result)
    }

    /// 执行单个命令
    async fn execute_command(&self, cmd: &ScriptCommand) -> Result<()> {
        let gpio = &self.gpio;
        match cmd {
            ScriptCommand::Numbering { mode } => {
                println!("  编号模式: {}", mode);
                let numbering: Numbering = mode.parse()?;
                gpio.set_numbering(numbering)?;
            },

            ScriptCommand::Setup {
                channel,
                direction,
                initial,
            } => {
                println!("  配置通道 {}: {}", channel, direction);
                let direction = parse_direction(direction)?;
                let initial = initial.as_deref().map(parse_level).transpose()?;
                gpio.setup(channel.clone(), direction, initial)?;
            },

            ScriptCommand::Output { channel, level } => {
                println!("  输出 {}: {}", channel, level);
                gpio.output(channel.clone(), parse_level(level)?)?;
            },

            ScriptCommand::Input { channel, expect } => {
                let level = gpio.input(channel.clone())?;
                println!("  读取 {}: {}", channel, level);
                if let Some(expected) = expect {
                    let expected = parse_level(expected)?;
                    if level != expected {
                        anyhow::bail!("通道 {} 期望 {}，实际 {}", channel, expected, level);
                    }
                }
            },

            ScriptCommand::Cleanup { channel } => {
                match channel {
                    Some(channel) => println!("  释放通道 {}", channel),
                    None => println!("  释放全部通道"),
                }
                gpio.cleanup(channel.clone())?;
            },

            ScriptCommand::Move {
                motor,
                degrees,
                speed,
            } => {
                MotionValidator::validate_degrees(*degrees)?;
                MotionValidator::validate_speed(*speed)?;
                let name = self.motor_name(motor);
                println!("  转动 {}: {}°（每步 {}°）", name, degrees, speed);
                gpio.motors().move_degrees(&name, *degrees, *speed)?;
                println!("    → {:.2}°", gpio.motors().angle(&name)?);
            },

            ScriptCommand::SetAngle { motor, degrees } => {
                MotionValidator::validate_degrees(*degrees)?;
                let name = self.motor_name(motor);
                println!("  设置 {}: {}°", name, degrees);
                gpio.motors().set_angle(&name, *degrees)?;
            },

            ScriptCommand::Mount { mount_type } => {
                println!("  支架类型: {}", mount_type);
                let mount: MountType = mount_type.parse()?;
                gpio.motors().setup_by_mount_type(mount)?;
            },

            ScriptCommand::Wait { duration_ms } => {
                println!("  等待: {} ms", duration_ms);
                tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
            },

            ScriptCommand::Table => {
                gpio.assembly().board().print_pins();
            },
        }
        Ok(())
    }

    /// `horizontal` / `vertical` 是配置中两个轴电机的别名，其他名称原样使用
    fn motor_name(&self, motor: &str) -> String {
        let names = self.gpio.motors().names();
        match motor.to_ascii_lowercase().as_str() {
            "horizontal" => names.horizontal.clone(),
            "vertical" => names.vertical.clone(),
            _ => motor.to_string(),
        }
    }
}

fn parse_direction(s: &str) -> Result<Direction> {
    match s.trim().to_ascii_uppercase().as_str() {
        "IN" | "INPUT" => Ok(Direction::In),
        "OUT" | "OUTPUT" => Ok(Direction::Out),
        other => anyhow::bail!("未知的方向: {:?}（可选 IN / OUT）", other),
    }
}
