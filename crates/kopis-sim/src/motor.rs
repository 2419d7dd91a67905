//! 步进电机
//!
//! 只模拟轴角度：角度始终归一化到 [0, 360)，`rotate_shaft_angle` 按步长分步转动，
//! 每一步都会提交并通知一次。

use crate::error::{Result, SimError};
use crate::hooks::{ChangeCallback, NotifySlot};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 一圈的角度
pub const FULL_TURN_DEG: f64 = 360.0;

/// 单次 `rotate_shaft_angle` 允许的最大步数（含余步）
pub const MAX_ROTATION_STEPS: u64 = 1_000_000;

/// 余步容差（相对于步长）
const REMAINDER_TOLERANCE: f64 = 1e-9;

/// 将任意有限角度归一化到 [0, 360)
///
/// -10 → 350，370 → 10，360 → 0。`-0.0` 归一化为 `0.0`。
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN_DEG);
    // 极小的负数经 rem_euclid 舍入后可能正好等于 360
    if wrapped >= FULL_TURN_DEG {
        0.0
    } else {
        wrapped + 0.0
    }
}

/// 转动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// 分步转动计划
///
/// `full_steps` 个 `step` 大小的整步，之后是一个 `remainder` 大小的余步（为 0 时省略）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPlan {
    pub direction: Direction,
    pub step: f64,
    pub full_steps: u64,
    pub remainder: f64,
}

impl RotationPlan {
    /// 计算转动计划；速度不大于 0 或有效角度为 0 时返回 `None`
    ///
    /// 余步由整步数反推（`magnitude - full_steps * speed`）。与 0 或 `speed`
    /// 相差不超过 `speed * 1e-9` 的余步分别记为 0 或一个整步。
    pub fn new(angle: f64, speed: f64) -> Option<Self> {
        if !(speed > 0.0) {
            return None;
        }

        let direction = if angle >= 0.0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        let magnitude = angle.abs() % FULL_TURN_DEG;
        if !(magnitude > 0.0) {
            return None;
        }

        // f64 → u64 的转换会饱和，超大步数由调用方按 MAX_ROTATION_STEPS 拒绝
        let mut full_steps = (magnitude / speed).floor() as u64;
        let mut remainder = if full_steps == 0 {
            magnitude
        } else {
            magnitude - full_steps as f64 * speed
        };

        let tolerance = speed * REMAINDER_TOLERANCE;
        if remainder <= tolerance {
            remainder = 0.0;
        } else if remainder >= speed - tolerance {
            full_steps = full_steps.saturating_add(1);
            remainder = 0.0;
        }

        Some(Self {
            direction,
            step: speed,
            full_steps,
            remainder,
        })
    }

    /// 通知次数（整步 + 余步）
    pub fn step_count(&self) -> u64 {
        self.full_steps.saturating_add(u64::from(self.remainder > 0.0))
    }

    /// 带符号的各步增量
    pub fn deltas(&self) -> impl Iterator<Item = f64> + '_ {
        let sign = self.direction.sign();
        let full_steps = usize::try_from(self.full_steps).unwrap_or(usize::MAX);
        let full = std::iter::repeat_n(self.step * sign, full_steps);
        let last = (self.remainder > 0.0).then_some(self.remainder * sign);
        full.chain(last)
    }
}

/// 电机状态快照
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorSnapshot {
    pub name: String,
    pub angle: f64,
}

/// 虚拟步进电机
#[derive(Debug)]
pub struct Motor {
    name: String,
    /// f64 的位模式
    angle_bits: AtomicU64,
    on_change: NotifySlot<Motor>,
}

impl Motor {
    /// 创建电机，初始角度为 0
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            angle_bits: AtomicU64::new(0.0f64.to_bits()),
            on_change: NotifySlot::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 当前轴角度，范围 [0, 360)
    pub fn shaft_angle(&self) -> f64 {
        f64::from_bits(self.angle_bits.load(Ordering::Relaxed))
    }

    /// 设置轴角度（归一化后存储并通知）
    ///
    /// # 错误
    ///
    /// NaN / ∞ 返回 [`SimError::NonFiniteAngle`]，角度不变。
    pub fn set_shaft_angle(&self, angle: f64) -> Result<()> {
        self.check_finite(angle)?;
        let angle = self.commit(angle);
        tracing::debug!(motor = %self.name, angle, "shaft angle set");
        Ok(())
    }

    /// 分步转动
    ///
    /// - `speed <= 0`（或 NaN）：空操作，不通知，也不检查 `angle`
    /// - 方向由 `angle` 的符号决定，非负为顺时针
    /// - 有效角度为 `|angle| mod 360`，为 0 时空操作
    /// - `floor(有效角度 / speed)` 个整步，之后一个余步（非 0 时）
    ///
    /// 每一步都以 “当前角度 + 带符号步长” 调用一次设置，因此每步通知一次。
    /// 各步之间不做误差修正，浮点累积误差保留在结果中。
    ///
    /// # 错误
    ///
    /// - `angle` 为 NaN / ∞：[`SimError::NonFiniteAngle`]
    /// - 步数超过 [`MAX_ROTATION_STEPS`]：[`SimError::TooManySteps`]
    ///
    /// 出错时角度不变，不通知。
    pub fn rotate_shaft_angle(&self, angle: f64, speed: f64) -> Result<()> {
        if !(speed > 0.0) {
            return Ok(());
        }
        self.check_finite(angle)?;
        let Some(plan) = RotationPlan::new(angle, speed) else {
            return Ok(());
        };

        let steps = plan.step_count();
        if steps > MAX_ROTATION_STEPS {
            return Err(SimError::TooManySteps {
                motor: self.name.clone(),
                steps,
                limit: MAX_ROTATION_STEPS,
            });
        }

        tracing::debug!(
            motor = %self.name,
            angle,
            speed,
            steps,
            "rotating shaft"
        );
        for delta in plan.deltas() {
            let reached = self.commit(self.shaft_angle() + delta);
            tracing::trace!(motor = %self.name, delta, angle = reached, "rotation step");
        }
        Ok(())
    }

    /// 回到 0°
    pub fn reset_shaft_angle(&self) -> Result<()> {
        self.set_shaft_angle(0.0)
    }

    /// 设置角度变更回调（替换已有回调）
    pub fn set_on_change<C>(&self, callback: C)
    where
        C: ChangeCallback<Motor> + 'static,
    {
        self.on_change.set(callback);
    }

    pub fn clear_on_change(&self) {
        self.on_change.clear();
    }

    pub fn has_on_change(&self) -> bool {
        self.on_change.is_set()
    }

    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            name: self.name.clone(),
            angle: self.shaft_angle(),
        }
    }

    fn check_finite(&self, value: f64) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(SimError::NonFiniteAngle {
                motor: self.name.clone(),
                value,
            })
        }
    }

    fn commit(&self, angle: f64) -> f64 {
        let angle = normalize_angle(angle);
        self.angle_bits.store(angle.to_bits(), Ordering::Relaxed);
        self.on_change.notify(self);
        angle
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.2}°", self.name, self.shaft_angle())
    }
}
