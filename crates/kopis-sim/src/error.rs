//! 仿真层错误类型定义

use crate::mode::PinMode;
use crate::pin::PinType;
use thiserror::Error;

/// 引脚查找键
///
/// 物理编号和 SoC 名称两种寻址方式共用一个 `PinNotFound` 变体。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinKey {
    /// 排针上的物理编号（1-26）
    BoardNumber(u8),
    /// SoC 引脚名（如 `PL10`）
    SocName(String),
}

impl std::fmt::Display for PinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinKey::BoardNumber(n) => write!(f, "board number {}", n),
            PinKey::SocName(name) => write!(f, "SoC name {:?}", name),
        }
    }
}

/// 仿真层错误类型
///
/// 所有错误都在违规点立即返回，引擎内部不做恢复；返回错误时状态未被修改。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// 该引脚类型不支持请求的模式（如普通 GPIO 请求 ALT）
    #[error("Pin {board_number} ({pin_type}) does not support mode {mode}")]
    InvalidMode {
        board_number: u8,
        pin_type: PinType,
        mode: PinMode,
    },

    /// 当前模式禁止写入电平（仅 OUTPUT 模式可写）
    #[error("Cannot write the state of pin {board_number} while in {mode} mode")]
    ModeViolation { board_number: u8, mode: PinMode },

    /// ALT 模式下电平没有意义，不可读取
    #[error("State of pin {board_number} is unavailable in ALT mode")]
    StateUnavailable { board_number: u8 },

    /// 电源/地引脚没有模式和电平
    #[error("Pin {board_number} is a {pin_type} pin and has no GPIO function")]
    NotGpio { board_number: u8, pin_type: PinType },

    /// 按键查找引脚失败
    #[error("No pin with {0}")]
    PinNotFound(PinKey),

    /// 按名称查找电机失败
    #[error("No motor named {name:?}")]
    MotorNotFound { name: String },

    /// 同一装配体中出现重名电机
    #[error("Motor {name:?} is declared more than once")]
    DuplicateMotor { name: String },

    /// 角度或速度不是有限数（NaN / ∞）
    #[error("Non-finite angle for motor {motor:?}: {value}")]
    NonFiniteAngle { motor: String, value: f64 },

    /// 一次转动需要的步数超过上限（步长相对角度过小）
    #[error("Rotation of motor {motor:?} needs {steps} steps, limit is {limit}")]
    TooManySteps { motor: String, steps: u64, limit: u64 },
}

/// 仿真层 Result 别名
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_error_display() {
        let err = SimError::InvalidMode {
            board_number: 12,
            pin_type: PinType::Gpio,
            mode: PinMode::Alt,
        };
        assert_eq!(err.to_string(), "Pin 12 (GPIO) does not support mode ALT");

        let err = SimError::ModeViolation {
            board_number: 8,
            mode: PinMode::Input,
        };
        assert_eq!(
            err.to_string(),
            "Cannot write the state of pin 8 while in INPUT mode"
        );

        let err = SimError::StateUnavailable { board_number: 3 };
        assert!(err.to_string().contains("ALT mode"));

        let err = SimError::PinNotFound(PinKey::BoardNumber(99));
        assert_eq!(err.to_string(), "No pin with board number 99");

        let err = SimError::PinNotFound(PinKey::SocName("NOPE".to_string()));
        assert_eq!(err.to_string(), "No pin with SoC name \"NOPE\"");

        let err = SimError::MotorNotFound {
            name: "spare".to_string(),
        };
        assert_eq!(err.to_string(), "No motor named \"spare\"");
    }

    #[test]
    fn test_not_gpio_display() {
        let err = SimError::NotGpio {
            board_number: 6,
            pin_type: PinType::Ground,
        };
        let msg = err.to_string();
        assert!(msg.contains("GROUND") && msg.contains('6'), "{}", msg);
    }
}
