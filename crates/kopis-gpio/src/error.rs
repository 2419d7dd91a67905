//! 脚本层错误类型定义

use crate::numbering::{Channel, Numbering};
use kopis_sim::SimError;
use thiserror::Error;

/// 脚本层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpioError {
    /// 尚未选择编号模式
    #[error("Numbering mode has not been set, call set_numbering(BOARD | SOC) first")]
    NumberingNotSet,

    /// 编号模式已选定，不能切换到另一种
    #[error("Numbering mode is already {current}, cannot switch to {requested}")]
    NumberingAlreadySet {
        current: Numbering,
        requested: Numbering,
    },

    /// 通道类型与当前编号模式不符
    #[error("Channel {channel} cannot be used in {numbering} numbering mode")]
    ChannelKindMismatch {
        channel: Channel,
        numbering: Numbering,
    },

    /// 通道没有通过 setup 配置
    #[error("Channel {channel} has not been set up")]
    NotSetUp { channel: Channel },

    /// 无法解析的编号模式名称
    #[error("Unknown numbering mode: {0:?} (expected BOARD or SOC)")]
    UnknownNumbering(String),

    /// 无法解析的赤道仪类型
    #[error("Unknown mount type: {0:?} (expected EQ or AZ)")]
    UnknownMountType(String),

    /// 极轴高度不是有限数
    #[error("Polar elevation must be finite, got {0}")]
    InvalidElevation(f64),

    /// 仿真层错误
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// 脚本层 Result 别名
pub type Result<T> = std::result::Result<T, GpioError>;
