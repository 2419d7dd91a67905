//! RPi.GPIO 风格的引脚接口
//!
//! ```rust
//! use kopis_gpio::{Direction, Gpio, Numbering};
//! use kopis_sim::PinLevel;
//!
//! let gpio = Gpio::new();
//! gpio.set_numbering(Numbering::Board)?;
//! gpio.setup(12, Direction::Out, Some(PinLevel::Low))?;
//! gpio.output(12, PinLevel::High)?;
//! assert_eq!(gpio.input(12)?, PinLevel::High);
//! gpio.cleanup(None)?;
//! # Ok::<(), kopis_gpio::GpioError>(())
//! ```

use crate::builder::GpioBuilder;
use crate::error::{GpioError, Result};
use crate::motorsim::{DEFAULT_POLAR_ELEVATION_DEG, MotorNames, MotorSim};
use crate::numbering::{Channel, Numbering};
use kopis_sim::{Assembly, Pin, PinLevel, PinMode};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// setup 方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    fn mode(self) -> PinMode {
        match self {
            Self::In => PinMode::Input,
            Self::Out => PinMode::Output,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "IN",
            Self::Out => "OUT",
        })
    }
}

/// 脚本层状态：编号模式 + 已配置的引脚
#[derive(Debug, Default)]
struct FacadeState {
    numbering: Option<Numbering>,
    /// 通过 setup 配置过的物理编号
    owned: BTreeSet<u8>,
}

/// 脚本接口
///
/// 内部持有 `Arc<Assembly>`，可与其他组件（可视化回调、录制器）共享同一装配体。
#[derive(Debug)]
pub struct Gpio {
    assembly: Arc<Assembly>,
    state: Mutex<FacadeState>,
    motors: MotorSim,
}

impl Gpio {
    /// 使用参考装配体创建
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(Assembly::new()),
            MotorNames::default(),
            DEFAULT_POLAR_ELEVATION_DEG,
        )
    }

    pub fn builder() -> GpioBuilder {
        GpioBuilder::new()
    }

    pub(crate) fn from_parts(
        assembly: Arc<Assembly>,
        motor_names: MotorNames,
        polar_elevation_deg: f64,
    ) -> Self {
        let motors = MotorSim::new(assembly.clone(), motor_names, polar_elevation_deg);
        Self {
            assembly,
            state: Mutex::new(FacadeState::default()),
            motors,
        }
    }

    pub fn assembly(&self) -> &Arc<Assembly> {
        &self.assembly
    }

    pub fn motors(&self) -> &MotorSim {
        &self.motors
    }

    /// 选择编号模式
    ///
    /// 可以重复设置同一模式；已选定后切换到另一模式返回
    /// [`GpioError::NumberingAlreadySet`]。
    pub fn set_numbering(&self, numbering: Numbering) -> Result<()> {
        let mut state = self.state.lock();
        match state.numbering {
            Some(current) if current != numbering => {
                tracing::warn!(%current, requested = %numbering, "numbering change rejected");
                Err(GpioError::NumberingAlreadySet {
                    current,
                    requested: numbering,
                })
            },
            _ => {
                state.numbering = Some(numbering);
                tracing::debug!(%numbering, "numbering mode set");
                Ok(())
            },
        }
    }

    pub fn numbering(&self) -> Option<Numbering> {
        self.state.lock().numbering
    }

    /// 配置通道方向
    ///
    /// `Out` 时若给出 `initial` 则立即写入该电平；`In` 忽略 `initial`。
    pub fn setup(
        &self,
        channel: impl Into<Channel>,
        direction: Direction,
        initial: Option<PinLevel>,
    ) -> Result<()> {
        let channel = channel.into();
        let result = self.setup_inner(&channel, direction, initial);
        log_rejected("setup", &channel, &result);
        result
    }

    fn setup_inner(
        &self,
        channel: &Channel,
        direction: Direction,
        initial: Option<PinLevel>,
    ) -> Result<()> {
        let pin = self.resolve(channel)?;
        pin.set_mode(direction.mode())?;
        match (direction, initial) {
            (Direction::Out, Some(level)) => pin.set_state(level)?,
            (Direction::In, Some(level)) => {
                tracing::warn!(%channel, %level, "initial level ignored for input channel");
            },
            (_, None) => {},
        }

        self.state.lock().owned.insert(pin.board_number());
        tracing::debug!(%channel, pin = pin.board_number(), %direction, "channel set up");
        Ok(())
    }

    /// 写电平
    ///
    /// 通道必须先 setup；输入通道由仿真层返回 `ModeViolation`。
    pub fn output(&self, channel: impl Into<Channel>, level: PinLevel) -> Result<()> {
        let channel = channel.into();
        let result = self
            .owned_pin(&channel)
            .and_then(|pin| pin.set_state(level).map_err(GpioError::from));
        log_rejected("output", &channel, &result);
        result
    }

    /// 读电平
    pub fn input(&self, channel: impl Into<Channel>) -> Result<PinLevel> {
        let channel = channel.into();
        let result = self
            .owned_pin(&channel)
            .and_then(|pin| pin.state().map_err(GpioError::from));
        log_rejected("input", &channel, &result);
        result
    }

    /// 释放通道：拉低并回到 OFF
    ///
    /// `None` 释放所有通过 setup 配置过的通道；未配置过的通道只记录警告。
    pub fn cleanup(&self, channel: Option<Channel>) -> Result<()> {
        let targets: Vec<u8> = match channel {
            None => std::mem::take(&mut self.state.lock().owned)
                .into_iter()
                .collect(),
            Some(channel) => {
                let pin = self.resolve(&channel)?;
                let number = pin.board_number();
                if !self.state.lock().owned.remove(&number) {
                    tracing::warn!(%channel, "cleanup of a channel that was never set up");
                    return Ok(());
                }
                vec![number]
            },
        };

        for number in &targets {
            self.assembly.board().pin(*number)?.reset()?;
        }
        tracing::debug!(released = targets.len(), "cleanup done");
        Ok(())
    }

    /// 当前通过 setup 配置过的物理编号（升序）
    pub fn owned_pins(&self) -> Vec<u8> {
        self.state.lock().owned.iter().copied().collect()
    }

    /// 按当前编号模式解析通道
    pub fn resolve(&self, channel: &Channel) -> Result<&Pin> {
        let numbering = self.numbering().ok_or(GpioError::NumberingNotSet)?;
        let board = self.assembly.board();
        let pin = match (numbering, channel) {
            (Numbering::Board, Channel::Board(n)) => board.pin(*n)?,
            (Numbering::Soc, Channel::Soc(name)) => board.pin_by_soc_name(name)?,
            _ => {
                return Err(GpioError::ChannelKindMismatch {
                    channel: channel.clone(),
                    numbering,
                });
            },
        };
        Ok(pin)
    }

    fn owned_pin(&self, channel: &Channel) -> Result<&Pin> {
        let pin = self.resolve(channel)?;
        if self.state.lock().owned.contains(&pin.board_number()) {
            Ok(pin)
        } else {
            Err(GpioError::NotSetUp {
                channel: channel.clone(),
            })
        }
    }
}

impl Default for Gpio {
    fn default() -> Self {
        Self::new()
    }
}

fn log_rejected<T>(operation: &str, channel: &Channel, result: &Result<T>) {
    if let Err(err) = result {
        tracing::warn!(operation, %channel, %err, "gpio call rejected");
    }
}
