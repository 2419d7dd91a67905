//! 引脚模式与电平定义
//!
//! 模式和电平以原子 `u8` 存放，所有引脚操作都只需 `&self`。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// GPIO / SPECIAL 引脚的工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PinMode {
    /// 未激活（默认）
    #[default]
    Off = 0,
    /// 读取模式
    Input = 1,
    /// 写入模式，只有此模式下可以写电平
    Output = 2,
    /// 复用功能（I2C/UART/SPI/PWM），仅 SPECIAL 引脚
    Alt = 3,
}

impl PinMode {
    /// 全部模式，按声明顺序
    pub const ALL: [PinMode; 4] = [PinMode::Off, PinMode::Input, PinMode::Output, PinMode::Alt];

    /// 从 u8 转换
    ///
    /// 无效值返回 Off。
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Input,
            2 => Self::Output,
            3 => Self::Alt,
            _ => Self::Off,
        }
    }

    /// 转换为 u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 引脚表中使用的短标签
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Input => "IN",
            Self::Output => "OUT",
            Self::Alt => "ALT",
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Off => "OFF",
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
            Self::Alt => "ALT",
        };
        f.write_str(s)
    }
}

/// 数字电平
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PinLevel {
    /// 低电平（默认）
    #[default]
    Low = 0,
    /// 高电平
    High = 1,
}

impl PinLevel {
    pub fn from_u8(value: u8) -> Self {
        if value == 0 { Self::Low } else { Self::High }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_high(self) -> bool {
        self == Self::High
    }

    /// 取反
    pub fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
        })
    }
}

/// 引脚模式（原子版本）
#[derive(Debug)]
pub(crate) struct AtomicPinMode {
    inner: AtomicU8,
}

impl AtomicPinMode {
    pub(crate) fn new(mode: PinMode) -> Self {
        Self {
            inner: AtomicU8::new(mode.as_u8()),
        }
    }

    pub(crate) fn get(&self) -> PinMode {
        PinMode::from_u8(self.inner.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, mode: PinMode) {
        self.inner.store(mode.as_u8(), Ordering::Relaxed);
    }
}

/// 引脚电平（原子版本）
#[derive(Debug)]
pub(crate) struct AtomicPinLevel {
    inner: AtomicU8,
}

impl AtomicPinLevel {
    pub(crate) fn new(level: PinLevel) -> Self {
        Self {
            inner: AtomicU8::new(level.as_u8()),
        }
    }

    pub(crate) fn get(&self) -> PinLevel {
        PinLevel::from_u8(self.inner.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, level: PinLevel) {
        self.inner.store(level.as_u8(), Ordering::Relaxed);
    }
}
