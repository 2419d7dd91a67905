//! KOPIS SDK - 虚拟 Orange Pi 3 LTS
//!
//! 用软件代替真实硬件的引脚 / 电机仿真，供脚本、可视化和测试程序使用。
//!
//! # 架构设计
//!
//! - **仿真层** (`sim`): 引脚、板卡、电机和变更回调
//! - **脚本层** (`gpio`): RPi.GPIO 风格接口和电机辅助接口
//!
//! # 快速开始
//!
//! ```rust
//! use kopis_sdk::prelude::*;
//!
//! init_logger();
//!
//! let gpio = Gpio::new();
//! gpio.set_numbering(Numbering::Board)?;
//! gpio.setup(15, Direction::Out, None)?;
//! gpio.output(15, PinLevel::High)?;
//! gpio.motors().setup_by_mount_type(MountType::Eq)?;
//!
//! gpio.assembly().board().print_pins();
//! # Ok::<(), GpioError>(())
//! ```

pub mod logging;
pub mod prelude;

pub use kopis_gpio as gpio;
pub use kopis_sim as sim;

pub use kopis_gpio::{Gpio, GpioError};
pub use kopis_sim::{Assembly, SimError};
pub use logging::{DEFAULT_LOG_DIRECTIVES, init_logger, init_logger_with};
