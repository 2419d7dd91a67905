//! KOPIS 脚本接口
//!
//! 在仿真引擎之上提供 RPi.GPIO 风格的接口：
//! - 编号模式（BOARD / SOC）选择与通道解析
//! - `setup` / `output` / `input` / `cleanup`
//! - 电机辅助接口（按名称转动、按支架类型初始化）
//!
//! 本 crate 只通过仿真引擎的公开操作和变更回调工作，不访问其内部状态。

mod builder;
mod error;
mod gpio;
pub mod motorsim;
mod numbering;

pub use builder::GpioBuilder;
pub use error::{GpioError, Result};
pub use gpio::{Direction, Gpio};
pub use motorsim::{DEFAULT_POLAR_ELEVATION_DEG, MotorNames, MotorSim, MountType};
pub use numbering::{Channel, Numbering};
