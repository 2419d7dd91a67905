//! 配置管理命令
//!
//! CLI 配置保存在 TOML 文件中（电机名称、极轴高度、演示节奏、脚本行为）。
//!
//! 路径优先级：`--config` 参数 > `KOPIS_CONFIG` 环境变量 > `<config_dir>/kopis/config.toml`

use anyhow::{Context, Result};
use clap::Subcommand;
use kopis_sdk::gpio::{DEFAULT_POLAR_ELEVATION_DEG, Gpio, MotorNames};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件路径的环境变量
pub const CONFIG_ENV: &str = "KOPIS_CONFIG";

/// 全部配置项
pub const CONFIG_KEYS: [&str; 5] = [
    "motors.horizontal",
    "motors.vertical",
    "mount.polar_elevation_deg",
    "demo.step_delay_ms",
    "script.continue_on_error",
];

/// 解析配置文件路径
pub fn config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("kopis");
    path.push("config.toml");
    Ok(path)
}

/// 支架配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// 赤道仪模式下垂直轴的角度
    pub polar_elevation_deg: f64,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            polar_elevation_deg: DEFAULT_POLAR_ELEVATION_DEG,
        }
    }
}

/// 演示程序配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// 节奏单位（毫秒），0 表示不等待
    pub step_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { step_delay_ms: 20 }
    }
}

/// 脚本配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// 命令失败时是否继续
    pub continue_on_error: bool,
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub motors: MotorNames,
    pub mount: MountConfig,
    pub demo: DemoConfig,
    pub script: ScriptSettings,
}

impl CliConfig {
    /// 加载配置，文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置（自动创建目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        let body = toml::to_string_pretty(self).context("序列化配置失败")?;
        let content = format!("# KOPIS CLI Configuration\n\n{}", body);
        fs::write(path, content).context("写入配置文件失败")?;
        Ok(())
    }

    /// 读取单个配置项
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "motors.horizontal" => self.motors.horizontal.clone(),
            "motors.vertical" => self.motors.vertical.clone(),
            "mount.polar_elevation_deg" => self.mount.polar_elevation_deg.to_string(),
            "demo.step_delay_ms" => self.demo.step_delay_ms.to_string(),
            "script.continue_on_error" => self.script.continue_on_error.to_string(),
            _ => anyhow::bail!("未知的配置项: {}（可选: {}）", key, CONFIG_KEYS.join(", ")),
        };
        Ok(value)
    }

    /// 设置单个配置项
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "motors.horizontal" => self.motors.horizontal = non_empty(key, value)?,
            "motors.vertical" => self.motors.vertical = non_empty(key, value)?,
            "mount.polar_elevation_deg" => {
                let degrees: f64 = value
                    .parse()
                    .with_context(|| format!("{} 需要一个数字，得到 {:?}", key, value))?;
                if !degrees.is_finite() {
                    anyhow::bail!("{} 必须是有限数", key);
                }
                self.mount.polar_elevation_deg = degrees;
            },
            "demo.step_delay_ms" => {
                self.demo.step_delay_ms = value
                    .parse()
                    .with_context(|| format!("{} 需要一个非负整数，得到 {:?}", key, value))?;
            },
            "script.continue_on_error" => {
                self.script.continue_on_error = value
                    .parse()
                    .with_context(|| format!("{} 需要 true 或 false，得到 {:?}", key, value))?;
            },
            _ => anyhow::bail!("未知的配置项: {}（可选: {}）", key, CONFIG_KEYS.join(", ")),
        }
        Ok(())
    }

    /// 按配置构造脚本接口
    ///
    /// 电机名称必须存在于参考装配体中。
    pub fn build_gpio(&self) -> Result<Gpio> {
        Gpio::builder()
            .motor_names(self.motors.clone())
            .polar_elevation_deg(self.mount.polar_elevation_deg)
            .build()
            .context("配置与虚拟装配体不匹配")
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("{} 不能为空", key);
    }
    Ok(value.to_string())
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 配置项名称（如 mount.polar_elevation_deg）
        key: String,

        /// 配置值
        value: String,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置是否可用
    Check,

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub async fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set { key, value } => Self::set_(path, &key, &value),
            ConfigCommand::Get { key } => Self::get_(path, &key),
            ConfigCommand::Check => Self::check_(path),
            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            },
        }
    }

    fn set_(path: &Path, key: &str, value: &str) -> Result<()> {
        let mut config = CliConfig::load(path)?;
        config.set(key, value)?;
        config.save(path)?;
        println!("✅ {} = {}", key, config.get(key)?);
        Ok(())
    }

    fn get_(path: &Path, key: &str) -> Result<()> {
        let config = CliConfig::load(path)?;

        if key == "all" {
            println!("KOPIS CLI 配置:");
            for key in CONFIG_KEYS {
                println!("  {} = {}", key, config.get(key)?);
            }
        } else {
            println!("{}", config.get(key)?);
        }
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let config = CliConfig::load(path)?;
        println!("配置文件: {}", path.display());
        if !path.exists() {
            println!("  (文件不存在，使用默认配置)");
        }

        let gpio = config.build_gpio()?;
        println!("  水平轴电机: {}", gpio.motors().names().horizontal);
        println!("  垂直轴电机: {}", gpio.motors().names().vertical);
        println!("  极轴高度: {}°", gpio.motors().polar_elevation_deg());
        println!("✅ 配置可用");
        Ok(())
    }
}
