//! 状态变化录制（Transition Recording）
//!
//! 把引脚/电机的变更回调转成快照，写入有界 Channel，供测试或另一个线程消费。
//!
//! - **Bounded Queue**: 默认容量 [`DEFAULT_CAPACITY`]
//! - **非阻塞**: 使用 `try_send`，队列满时丢弃新事件并计数
//!
//! # 使用示例
//!
//! ```rust
//! use kopis_sim::{Assembly, PinMode};
//! use kopis_sim::recording::{Transition, TransitionRecorder};
//!
//! let assembly = Assembly::new();
//! let (recorder, rx) = TransitionRecorder::new();
//! recorder.attach(&assembly);
//!
//! assembly.board().pin(12)?.set_mode(PinMode::Output)?;
//! assert!(matches!(rx.try_recv(), Ok(Transition::Pin(s)) if s.board_number == 12));
//! # Ok::<(), kopis_sim::SimError>(())
//! ```

use crate::assembly::Assembly;
use crate::motor::{Motor, MotorSnapshot};
use crate::pin::{Pin, PinSnapshot};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 默认队列容量
pub const DEFAULT_CAPACITY: usize = 10_000;

/// 一次已提交的状态变化
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    Pin(PinSnapshot),
    Motor(MotorSnapshot),
}

impl Transition {
    pub fn as_pin(&self) -> Option<&PinSnapshot> {
        match self {
            Self::Pin(snapshot) => Some(snapshot),
            Self::Motor(_) => None,
        }
    }

    pub fn as_motor(&self) -> Option<&MotorSnapshot> {
        match self {
            Self::Motor(snapshot) => Some(snapshot),
            Self::Pin(_) => None,
        }
    }
}

/// 状态变化录制器
///
/// 克隆开销很小：所有克隆共享同一个发送端和计数器。
#[derive(Debug, Clone)]
pub struct TransitionRecorder {
    tx: Sender<Transition>,
    /// 丢弃计数（队列满或接收端已关闭）
    dropped: Arc<AtomicU64>,
    /// 成功写入计数
    recorded: Arc<AtomicU64>,
}

impl TransitionRecorder {
    /// 创建录制器，容量为 [`DEFAULT_CAPACITY`]
    #[must_use]
    pub fn new() -> (Self, Receiver<Transition>) {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> (Self, Receiver<Transition>) {
        let (tx, rx) = bounded(capacity);
        let recorder = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            recorded: Arc::new(AtomicU64::new(0)),
        };
        (recorder, rx)
    }

    /// 引脚回调，可直接传给 [`Pin::set_on_change`]
    pub fn pin_callback(&self) -> impl Fn(&Pin) + Send + Sync + 'static {
        let recorder = self.clone();
        move |pin: &Pin| recorder.push(Transition::Pin(pin.snapshot()))
    }

    /// 电机回调，可直接传给 [`Motor::set_on_change`]
    pub fn motor_callback(&self) -> impl Fn(&Motor) + Send + Sync + 'static {
        let recorder = self.clone();
        move |motor: &Motor| recorder.push(Transition::Motor(motor.snapshot()))
    }

    /// 为装配体中的每个引脚和电机注册回调（替换已有回调）
    pub fn attach(&self, assembly: &Assembly) {
        for pin in assembly.board().pins() {
            pin.set_on_change(self.pin_callback());
        }
        for motor in assembly.motors() {
            motor.set_on_change(self.motor_callback());
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn recorded_count(&self) -> u64 {
        self.recorded.load(Ordering::Relaxed)
    }

    fn push(&self, transition: Transition) {
        if self.tx.try_send(transition).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        } else {
            self.recorded.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::VERTICAL_MOTOR;
    use crate::mode::{PinLevel, PinMode};

    #[test]
    fn test_records_pin_and_motor_transitions() {
        let assembly = Assembly::new();
        let (recorder, rx) = TransitionRecorder::new();
        recorder.attach(&assembly);

        let pin = assembly.board().pin(12).unwrap();
        pin.set_mode(PinMode::Output).unwrap();
        pin.set_state(PinLevel::High).unwrap();
        assembly
            .motor(VERTICAL_MOTOR)
            .unwrap()
            .rotate_shaft_angle(20.0, 10.0)
            .unwrap();

        let events: Vec<Transition> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1].as_pin().unwrap().state,
            Some(PinLevel::High)
        );
        let angles: Vec<f64> = events[2..]
            .iter()
            .map(|t| t.as_motor().unwrap().angle)
            .collect();
        assert_eq!(angles, vec![10.0, 20.0]);
        assert_eq!(recorder.recorded_count(), 4);
    }

    #[test]
    fn test_full_queue_drops_new_events() {
        let assembly = Assembly::new();
        let (recorder, rx) = TransitionRecorder::with_capacity(2);
        recorder.attach(&assembly);

        let pin = assembly.board().pin(16).unwrap();
        for mode in [PinMode::Input, PinMode::Output, PinMode::Off] {
            pin.set_mode(mode).unwrap();
        }

        assert_eq!(recorder.dropped_count(), 1);
        let modes: Vec<_> = rx.try_iter().map(|t| t.as_pin().unwrap().mode).collect();
        assert_eq!(modes, vec![Some(PinMode::Input), Some(PinMode::Output)]);
    }

    #[test]
    fn test_closed_receiver_counts_as_dropped() {
        let assembly = Assembly::new();
        let (recorder, rx) = TransitionRecorder::new();
        recorder.attach(&assembly);
        drop(rx);

        assembly.board().pin(18).unwrap().set_mode(PinMode::Input).unwrap();
        assert_eq!(recorder.dropped_count(), 1);
    }
}
