//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use kopis_sdk::prelude::*;
//! ```

// 仿真引擎
pub use kopis_sim::{
    Assembly, AssemblyBuilder, Board, Motor, Pin, PinLevel, PinMode, PinType, SimError,
    Transition, TransitionRecorder,
};

// 脚本接口
pub use kopis_gpio::{Channel, Direction, Gpio, GpioError, MountType, Numbering};

pub use crate::logging::init_logger;
