//! KOPIS 仿真引擎
//!
//! 用软件代替真实硬件的虚拟 Orange Pi 3 LTS：
//! - 引脚模型（GPIO / SPECIAL / POWER / GROUND）及模式、电平合法性规则
//! - 板卡引脚注册表（按物理编号 / SoC 名称查找）
//! - 步进电机轴角度与分步转动
//! - 每个引脚、电机一个同步变更回调
//!
//! 所有操作只需 `&self`：模式、电平、角度以原子量存储，回调槽使用 `ArcSwapOption`，
//! 调用回调时不持有任何锁。
//!
//! # 使用示例
//!
//! ```rust
//! use kopis_sim::{Assembly, PinLevel, PinMode};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! let assembly = Assembly::new();
//! let pin = assembly.board().pin(12)?;
//!
//! let changes = Arc::new(AtomicU64::new(0));
//! let counter = changes.clone();
//! pin.set_on_change(move |_pin: &kopis_sim::Pin| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! pin.set_mode(PinMode::Output)?;
//! pin.set_state(PinLevel::High)?;
//! assert_eq!(changes.load(Ordering::Relaxed), 2);
//! # Ok::<(), kopis_sim::SimError>(())
//! ```

mod assembly;
mod board;
mod error;
pub mod hooks;
pub mod layout;
pub mod mode;
pub mod motor;
mod pin;
pub mod recording;
mod table;

pub use assembly::{Assembly, AssemblyBuilder, HORIZONTAL_MOTOR, VERTICAL_MOTOR};
pub use board::Board;
pub use error::{PinKey, Result, SimError};
pub use hooks::{ChangeCallback, NotifySlot};
pub use mode::{PinLevel, PinMode};
pub use motor::{Motor, MotorSnapshot, normalize_angle};
pub use pin::{Pin, PinSnapshot, PinType};
pub use recording::{Transition, TransitionRecorder};
pub use table::PinTable;
