//! 编号模式与通道
//!
//! - `BOARD`: 通道是排针物理编号（1-26）
//! - `SOC`: 通道是 SoC 引脚名（如 `PL10`）

use crate::error::GpioError;
use std::fmt;
use std::str::FromStr;

/// 编号模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Numbering {
    /// 物理编号
    Board,
    /// SoC 引脚名
    Soc,
}

impl fmt::Display for Numbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Board => "BOARD",
            Self::Soc => "SOC",
        })
    }
}

impl FromStr for Numbering {
    type Err = GpioError;

    /// 不区分大小写：`board` / `soc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOARD" => Ok(Self::Board),
            "SOC" => Ok(Self::Soc),
            _ => Err(GpioError::UnknownNumbering(s.to_string())),
        }
    }
}

/// 通道：物理编号或 SoC 名称
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Channel {
    Board(u8),
    Soc(String),
}

impl Channel {
    /// 该通道适用的编号模式
    pub fn numbering(&self) -> Numbering {
        match self {
            Self::Board(_) => Numbering::Board,
            Self::Soc(_) => Numbering::Soc,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(n) => write!(f, "{}", n),
            Self::Soc(name) => write!(f, "{:?}", name),
        }
    }
}

impl From<u8> for Channel {
    fn from(board_number: u8) -> Self {
        Self::Board(board_number)
    }
}

impl From<&str> for Channel {
    fn from(soc_name: &str) -> Self {
        Self::Soc(soc_name.to_string())
    }
}

impl From<String> for Channel {
    fn from(soc_name: String) -> Self {
        Self::Soc(soc_name)
    }
}
