//! Builder 模式实现
//!
//! 提供链式构造 [`Gpio`] 实例的便捷方式。

use crate::error::{GpioError, Result};
use crate::gpio::Gpio;
use crate::motorsim::{DEFAULT_POLAR_ELEVATION_DEG, MotorNames};
use kopis_sim::Assembly;
use std::sync::Arc;

/// Gpio Builder（链式构造）
///
/// # Example
///
/// ```rust
/// use kopis_gpio::{Gpio, MotorNames};
/// use kopis_sim::Assembly;
/// use std::sync::Arc;
///
/// let assembly = Arc::new(Assembly::builder().motors(["pan", "tilt"]).build()?);
/// let gpio = Gpio::builder()
///     .assembly(assembly)
///     .motor_names(MotorNames {
///         horizontal: "pan".to_string(),
///         vertical: "tilt".to_string(),
///     })
///     .polar_elevation_deg(45.0)
///     .build()?;
/// assert_eq!(gpio.motors().polar_elevation_deg(), 45.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct GpioBuilder {
    assembly: Option<Arc<Assembly>>,
    motor_names: Option<MotorNames>,
    polar_elevation_deg: Option<f64>,
}

impl GpioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有装配体（可选，默认新建参考装配体）
    pub fn assembly(mut self, assembly: Arc<Assembly>) -> Self {
        self.assembly = Some(assembly);
        self
    }

    /// 水平 / 垂直轴电机名称（可选，默认参考电机）
    pub fn motor_names(mut self, names: MotorNames) -> Self {
        self.motor_names = Some(names);
        self
    }

    /// 赤道仪模式下垂直轴的极轴高度（可选，默认 58°）
    pub fn polar_elevation_deg(mut self, degrees: f64) -> Self {
        self.polar_elevation_deg = Some(degrees);
        self
    }

    /// 构造 Gpio
    ///
    /// # 错误
    ///
    /// - 电机名称在装配体中不存在：`MotorNotFound`
    /// - 极轴高度不是有限数：[`GpioError::InvalidElevation`]
    pub fn build(self) -> Result<Gpio> {
        let assembly = self
            .assembly
            .unwrap_or_else(|| Arc::new(Assembly::new()));
        let names = self.motor_names.unwrap_or_default();
        let elevation = self
            .polar_elevation_deg
            .unwrap_or(DEFAULT_POLAR_ELEVATION_DEG);

        if !elevation.is_finite() {
            return Err(GpioError::InvalidElevation(elevation));
        }
        assembly.motor(&names.horizontal)?;
        assembly.motor(&names.vertical)?;

        Ok(Gpio::from_parts(assembly, names, elevation))
    }
}
