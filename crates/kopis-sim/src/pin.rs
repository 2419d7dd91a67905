//! 引脚模型
//!
//! 四种引脚（GPIO / SPECIAL / POWER / GROUND）用一个带标签的结构表示：
//! SPECIAL 与 GPIO 共用同一份存储，区别只在于是否带有 ALT 功能。
//!
//! # 合法性规则
//!
//! | 操作 | GPIO | SPECIAL | POWER / GROUND |
//! |---|---|---|---|
//! | `set_mode(Off/Input/Output)` | ✅ | ✅ | `NotGpio` |
//! | `set_mode(Alt)` | `InvalidMode` | ✅ | `NotGpio` |
//! | `set_state` | 仅 OUTPUT | 仅 OUTPUT | `NotGpio` |
//! | `state` | ✅ | ALT 下 `StateUnavailable` | `NotGpio` |
//!
//! 所有修改都遵循 “校验 → 写入 → 通知”，失败时不修改任何状态。

use crate::error::{Result, SimError};
use crate::hooks::{ChangeCallback, NotifySlot};
use crate::layout::{PinFunction, PinSpec};
use crate::mode::{AtomicPinLevel, AtomicPinMode, PinLevel, PinMode};
use std::fmt;

/// 引脚类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinType {
    Gpio,
    /// 带复用功能（I2C、UART、SPI、PWM）的 GPIO
    Special,
    Power,
    Ground,
}

impl PinType {
    /// 是否具备模式/电平（GPIO 或 SPECIAL）
    pub fn has_gpio_function(self) -> bool {
        matches!(self, Self::Gpio | Self::Special)
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gpio => "GPIO",
            Self::Special => "SPECIAL",
            Self::Power => "POWER",
            Self::Ground => "GROUND",
        })
    }
}

/// GPIO 线路（GPIO 与 SPECIAL 共用）
#[derive(Debug)]
struct GpioLine {
    soc_name: &'static str,
    gpio_number: u16,
    /// `Some` 表示 SPECIAL 引脚，允许进入 ALT 模式
    alt_function: Option<&'static str>,
    mode: AtomicPinMode,
    state: AtomicPinLevel,
}

#[derive(Debug)]
enum PinKind {
    Gpio(GpioLine),
    Power,
    Ground,
}

/// 排针上的一个物理位置
///
/// 引脚由 [`Board`](crate::Board) 独占；外部只持有 `&Pin`，
/// 需要长期引用时保存物理编号，再通过板卡查找。
#[derive(Debug)]
pub struct Pin {
    board_number: u8,
    name: &'static str,
    kind: PinKind,
    on_change: NotifySlot<Pin>,
}

/// 引脚状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinSnapshot {
    pub board_number: u8,
    pub pin_type: PinType,
    /// POWER / GROUND 为 `None`
    pub mode: Option<PinMode>,
    /// POWER / GROUND 以及 ALT 模式下为 `None`
    pub state: Option<PinLevel>,
}

impl Pin {
    pub(crate) fn from_spec(spec: &PinSpec) -> Self {
        let kind = match spec.function {
            PinFunction::Power => PinKind::Power,
            PinFunction::Ground => PinKind::Ground,
            PinFunction::Gpio {
                soc_name,
                gpio_number,
            } => PinKind::Gpio(GpioLine::new(soc_name, gpio_number, None)),
            PinFunction::Special {
                soc_name,
                gpio_number,
                alt_function,
            } => PinKind::Gpio(GpioLine::new(soc_name, gpio_number, Some(alt_function))),
        };

        Self {
            board_number: spec.board_number,
            name: spec.name,
            kind,
            on_change: NotifySlot::new(),
        }
    }

    /// 物理编号（1-26）
    pub fn board_number(&self) -> u8 {
        self.board_number
    }

    /// 丝印名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pin_type(&self) -> PinType {
        match &self.kind {
            PinKind::Gpio(line) if line.alt_function.is_some() => PinType::Special,
            PinKind::Gpio(_) => PinType::Gpio,
            PinKind::Power => PinType::Power,
            PinKind::Ground => PinType::Ground,
        }
    }

    /// SoC 引脚名，POWER / GROUND 为 `None`
    pub fn soc_name(&self) -> Option<&'static str> {
        self.gpio_line().map(|line| line.soc_name)
    }

    /// GPIO 编号，POWER / GROUND 为 `None`
    pub fn gpio_number(&self) -> Option<u16> {
        self.gpio_line().map(|line| line.gpio_number)
    }

    /// ALT 功能名，仅 SPECIAL 引脚有
    pub fn alt_function(&self) -> Option<&'static str> {
        self.gpio_line().and_then(|line| line.alt_function)
    }

    /// 当前模式
    pub fn mode(&self) -> Result<PinMode> {
        Ok(self.require_gpio()?.mode.get())
    }

    /// 设置模式
    ///
    /// 普通 GPIO 请求 ALT 返回 [`SimError::InvalidMode`]。
    /// 成功后通知订阅者，即使模式与之前相同。
    pub fn set_mode(&self, mode: PinMode) -> Result<()> {
        let line = self.require_gpio()?;
        if mode == PinMode::Alt && line.alt_function.is_none() {
            return Err(SimError::InvalidMode {
                board_number: self.board_number,
                pin_type: self.pin_type(),
                mode,
            });
        }

        line.mode.set(mode);
        tracing::debug!(pin = self.board_number, %mode, "pin mode changed");
        self.on_change.notify(self);
        Ok(())
    }

    /// 当前电平
    ///
    /// SPECIAL 引脚处于 ALT 模式时返回 [`SimError::StateUnavailable`]。
    pub fn state(&self) -> Result<PinLevel> {
        let line = self.require_gpio()?;
        if line.mode.get() == PinMode::Alt {
            return Err(SimError::StateUnavailable {
                board_number: self.board_number,
            });
        }
        Ok(line.state.get())
    }

    /// 写电平，仅 OUTPUT 模式允许
    pub fn set_state(&self, level: PinLevel) -> Result<()> {
        let line = self.require_gpio()?;
        let mode = line.mode.get();
        if mode != PinMode::Output {
            return Err(SimError::ModeViolation {
                board_number: self.board_number,
                mode,
            });
        }

        line.state.set(level);
        tracing::debug!(pin = self.board_number, %level, "pin state changed");
        self.on_change.notify(self);
        Ok(())
    }

    /// 设置变更回调（替换已有回调）
    ///
    /// 回调在 `set_mode` / `set_state` 提交之后同步调用，参数为本引脚。
    pub fn set_on_change<C>(&self, callback: C)
    where
        C: ChangeCallback<Pin> + 'static,
    {
        self.on_change.set(callback);
    }

    /// 移除变更回调
    pub fn clear_on_change(&self) {
        self.on_change.clear();
    }

    pub fn has_on_change(&self) -> bool {
        self.on_change.is_set()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> PinSnapshot {
        let (mode, state) = match self.gpio_line() {
            Some(line) => {
                let mode = line.mode.get();
                let state = (mode != PinMode::Alt).then(|| line.state.get());
                (Some(mode), state)
            },
            None => (None, None),
        };

        PinSnapshot {
            board_number: self.board_number,
            pin_type: self.pin_type(),
            mode,
            state,
        }
    }

    /// 回到 OFF；OUTPUT 且为 HIGH 时先拉低
    ///
    /// 只有真正发生变化时才触发通知。返回是否有变化，POWER / GROUND 总是 `false`。
    pub fn reset(&self) -> Result<bool> {
        let Some(line) = self.gpio_line() else {
            return Ok(false);
        };

        let mut changed = false;
        let mode = line.mode.get();
        if mode == PinMode::Output && line.state.get() == PinLevel::High {
            self.set_state(PinLevel::Low)?;
            changed = true;
        }
        if mode != PinMode::Off {
            self.set_mode(PinMode::Off)?;
            changed = true;
        }
        Ok(changed)
    }

    fn gpio_line(&self) -> Option<&GpioLine> {
        match &self.kind {
            PinKind::Gpio(line) => Some(line),
            PinKind::Power | PinKind::Ground => None,
        }
    }

    fn require_gpio(&self) -> Result<&GpioLine> {
        self.gpio_line().ok_or(SimError::NotGpio {
            board_number: self.board_number,
            pin_type: self.pin_type(),
        })
    }
}

impl GpioLine {
    fn new(soc_name: &'static str, gpio_number: u16, alt_function: Option<&'static str>) -> Self {
        Self {
            soc_name,
            gpio_number,
            alt_function,
            mode: AtomicPinMode::new(PinMode::Off),
            state: AtomicPinLevel::new(PinLevel::Low),
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.soc_name() {
            Some(soc) => write!(f, "pin {} ({}, {})", self.board_number, self.name, soc),
            None => write!(f, "pin {} ({})", self.board_number, self.name),
        }
    }
}
