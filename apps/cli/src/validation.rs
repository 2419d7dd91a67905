//! 输入验证模块
//!
//! 命令行和脚本参数的解析与验证

use anyhow::{Context, Result};
use kopis_sdk::prelude::{PinLevel, PinMode};
use std::path::Path;

/// 解析引脚模式（不区分大小写）
///
/// 接受 `OFF`、`IN` / `INPUT`、`OUT` / `OUTPUT`、`ALT`。
pub fn parse_mode(s: &str) -> Result<PinMode> {
    match s.trim().to_ascii_uppercase().as_str() {
        "OFF" => Ok(PinMode::Off),
        "IN" | "INPUT" => Ok(PinMode::Input),
        "OUT" | "OUTPUT" => Ok(PinMode::Output),
        "ALT" => Ok(PinMode::Alt),
        other => anyhow::bail!("未知的引脚模式: {:?}（可选 OFF / IN / OUT / ALT）", other),
    }
}

/// 解析电平：`0` / `1` / `LOW` / `HIGH`
pub fn parse_level(s: &str) -> Result<PinLevel> {
    match s.trim().to_ascii_uppercase().as_str() {
        "0" | "LOW" => Ok(PinLevel::Low),
        "1" | "HIGH" => Ok(PinLevel::High),
        other => anyhow::bail!("未知的电平: {:?}（可选 0 / 1 / LOW / HIGH）", other),
    }
}

/// `table --setup` 的一项：`N:MODE[:LEVEL]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSetup {
    pub board_number: u8,
    pub mode: PinMode,
    pub level: Option<PinLevel>,
}

/// 解析 `N:MODE[:LEVEL]`，如 `12:OUT:1`、`19:ALT`
pub fn parse_pin_setup(s: &str) -> Result<PinSetup> {
    let mut parts = s.split(':');
    let number = parts.next().unwrap_or_default();
    let board_number: u8 = number
        .trim()
        .parse()
        .with_context(|| format!("无效的引脚编号: {:?}", number))?;

    let mode = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("缺少引脚模式，格式为 N:MODE[:LEVEL]"))
        .and_then(parse_mode)?;
    let level = parts.next().map(parse_level).transpose()?;

    if parts.next().is_some() {
        anyhow::bail!("多余的字段: {:?}，格式为 N:MODE[:LEVEL]", s);
    }
    if level.is_some() && mode != PinMode::Output {
        anyhow::bail!("只有 OUT 模式可以指定电平: {:?}", s);
    }

    Ok(PinSetup {
        board_number,
        mode,
        level,
    })
}

/// 角度 / 速度验证
pub struct MotionValidator;

impl MotionValidator {
    /// 角度必须是有限数
    pub fn validate_degrees(degrees: f64) -> Result<()> {
        if !degrees.is_finite() {
            anyhow::bail!("角度无效: {}", degrees);
        }
        Ok(())
    }

    /// 速度必须是正的有限数
    ///
    /// 仿真层对非正速度不做任何动作，脚本层直接报错。
    pub fn validate_speed(speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            anyhow::bail!("速度必须大于 0，得到 {}", speed);
        }
        Ok(())
    }
}

/// 文件路径验证器
pub struct PathValidator {
    /// 是否检查文件存在
    check_exists: bool,
}

impl PathValidator {
    pub fn new() -> Self {
        Self {
            check_exists: false,
        }
    }

    /// 要求文件存在
    pub fn must_exist(mut self) -> Self {
        self.check_exists = true;
        self
    }

    /// 验证文件路径
    pub fn validate_path(&self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            anyhow::bail!("文件路径为空");
        }

        if self.check_exists && !path.exists() {
            anyhow::bail!("文件不存在: {}", path.display());
        }

        Ok(())
    }
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::new()
    }
}
