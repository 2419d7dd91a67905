//! 电机辅助接口
//!
//! 按名称转动电机，以及按赤道仪 / 地平仪类型把两个轴放到初始位置。

use crate::error::{GpioError, Result};
use kopis_sim::{Assembly, HORIZONTAL_MOTOR, Motor, VERTICAL_MOTOR};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 默认极轴高度（度）
pub const DEFAULT_POLAR_ELEVATION_DEG: f64 = 58.0;

/// 支架类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MountType {
    /// 赤道仪：垂直轴抬到极轴高度
    Eq,
    /// 地平仪：两个轴都回到 0°
    Az,
}

impl fmt::Display for MountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "EQ",
            Self::Az => "AZ",
        })
    }
}

impl FromStr for MountType {
    type Err = GpioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQ" => Ok(Self::Eq),
            "AZ" => Ok(Self::Az),
            _ => Err(GpioError::UnknownMountType(s.to_string())),
        }
    }
}

/// 水平 / 垂直轴对应的电机名称
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorNames {
    pub horizontal: String,
    pub vertical: String,
}

impl Default for MotorNames {
    fn default() -> Self {
        Self {
            horizontal: HORIZONTAL_MOTOR.to_string(),
            vertical: VERTICAL_MOTOR.to_string(),
        }
    }
}

/// 电机辅助接口（通过 [`Gpio::motors`](crate::Gpio::motors) 获取）
#[derive(Debug)]
pub struct MotorSim {
    assembly: Arc<Assembly>,
    names: MotorNames,
    polar_elevation_deg: f64,
}

impl MotorSim {
    pub(crate) fn new(assembly: Arc<Assembly>, names: MotorNames, polar_elevation_deg: f64) -> Self {
        Self {
            assembly,
            names,
            polar_elevation_deg,
        }
    }

    pub fn names(&self) -> &MotorNames {
        &self.names
    }

    pub fn polar_elevation_deg(&self) -> f64 {
        self.polar_elevation_deg
    }

    pub fn horizontal(&self) -> Result<&Motor> {
        Ok(self.assembly.motor(&self.names.horizontal)?)
    }

    pub fn vertical(&self) -> Result<&Motor> {
        Ok(self.assembly.motor(&self.names.vertical)?)
    }

    /// 分步转动 `degrees` 度，每步 `speed` 度
    pub fn move_degrees(&self, name: &str, degrees: f64, speed: f64) -> Result<()> {
        let motor = self.assembly.motor(name)?;
        motor.rotate_shaft_angle(degrees, speed).inspect_err(|err| {
            tracing::warn!(motor = name, degrees, speed, %err, "move rejected");
        })?;
        Ok(())
    }

    /// 直接设置角度
    pub fn set_angle(&self, name: &str, degrees: f64) -> Result<()> {
        self.assembly.motor(name)?.set_shaft_angle(degrees)?;
        Ok(())
    }

    pub fn angle(&self, name: &str) -> Result<f64> {
        Ok(self.assembly.motor(name)?.shaft_angle())
    }

    /// 装配体中的所有电机回到 0°
    pub fn reset_all(&self) -> Result<()> {
        for motor in self.assembly.motors() {
            motor.reset_shaft_angle()?;
        }
        Ok(())
    }

    /// 按支架类型设置初始位置
    ///
    /// - `Az`: 两个轴回到 0°
    /// - `Eq`: 水平轴回到 0°，垂直轴转到极轴高度
    pub fn setup_by_mount_type(&self, mount: MountType) -> Result<()> {
        let horizontal = self.horizontal()?;
        let vertical = self.vertical()?;

        horizontal.reset_shaft_angle()?;
        match mount {
            MountType::Az => vertical.reset_shaft_angle()?,
            MountType::Eq => vertical.set_shaft_angle(self.polar_elevation_deg)?,
        }
        tracing::info!(
            %mount,
            horizontal = horizontal.shaft_angle(),
            vertical = vertical.shaft_angle(),
            "motors positioned for mount"
        );
        Ok(())
    }
}
