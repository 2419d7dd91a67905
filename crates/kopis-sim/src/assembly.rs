//! 装配体：一块板卡 + 一组电机
//!
//! 外部协作者拿到的顶层句柄。板卡与电机在构造时全部创建，之后只有
//! 模式、电平、角度会变化。

use crate::board::Board;
use crate::error::{Result, SimError};
use crate::motor::Motor;

/// 水平轴参考电机名称
pub const HORIZONTAL_MOTOR: &str = "#Nema17HS8401_Horizontal";

/// 垂直轴参考电机名称
pub const VERTICAL_MOTOR: &str = "#Nema17HS8401_Vertical";

/// 虚拟装配体
///
/// 所有操作只需 `&self`，可以放进 `Arc` 里让回调捕获，用来联动其他引脚或电机。
///
/// # Example
///
/// ```rust
/// use kopis_sim::{Assembly, PinMode, PinLevel};
///
/// let assembly = Assembly::new();
/// let pin = assembly.board().pin(12)?;
/// pin.set_mode(PinMode::Output)?;
/// pin.set_state(PinLevel::High)?;
///
/// let motor = assembly.motor("#Nema17HS8401_Vertical")?;
/// motor.rotate_shaft_angle(58.0, 1.0)?;
/// assert_eq!(motor.shaft_angle(), 58.0);
/// # Ok::<(), kopis_sim::SimError>(())
/// ```
#[derive(Debug)]
pub struct Assembly {
    board: Board,
    motors: Vec<Motor>,
}

impl Assembly {
    /// 参考布局：Orange Pi 3 LTS + 水平/垂直两个 NEMA 17 电机
    pub fn new() -> Self {
        let assembly = Self {
            board: Board::new(),
            motors: vec![Motor::new(HORIZONTAL_MOTOR), Motor::new(VERTICAL_MOTOR)],
        };
        assembly.log_created();
        assembly
    }

    /// 自定义电机组
    pub fn builder() -> AssemblyBuilder {
        AssemblyBuilder::new()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 全部电机（按声明顺序）
    pub fn motors(&self) -> impl ExactSizeIterator<Item = &Motor> + '_ {
        self.motors.iter()
    }

    /// 按名称查找电机（区分大小写）
    pub fn motor(&self, name: &str) -> Result<&Motor> {
        self.motors
            .iter()
            .find(|motor| motor.name() == name)
            .ok_or_else(|| SimError::MotorNotFound {
                name: name.to_string(),
            })
    }

    /// 板卡复位，所有电机回到 0°
    pub fn reset(&self) -> Result<()> {
        self.board.reset()?;
        for motor in &self.motors {
            motor.reset_shaft_angle()?;
        }
        Ok(())
    }

    fn log_created(&self) {
        tracing::info!(
            model = self.board.model(),
            pins = self.board.pin_count(),
            motors = self.motors.len(),
            "virtual assembly created"
        );
    }
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembly Builder（链式构造）
///
/// 板卡布局固定，只有电机组可以替换。未添加任何电机时使用参考电机。
///
/// ```rust
/// use kopis_sim::Assembly;
///
/// let assembly = Assembly::builder()
///     .motor("pan")
///     .motor("tilt")
///     .build()?;
/// assert_eq!(assembly.motors().len(), 2);
/// # Ok::<(), kopis_sim::SimError>(())
/// ```
#[derive(Debug, Default)]
pub struct AssemblyBuilder {
    motor_names: Vec<String>,
}

impl AssemblyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个电机
    pub fn motor(mut self, name: impl Into<String>) -> Self {
        self.motor_names.push(name.into());
        self
    }

    /// 追加多个电机
    pub fn motors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.motor_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// 构造装配体
    ///
    /// # 错误
    ///
    /// 电机重名时返回 [`SimError::DuplicateMotor`]。
    pub fn build(self) -> Result<Assembly> {
        let names = if self.motor_names.is_empty() {
            vec![HORIZONTAL_MOTOR.to_string(), VERTICAL_MOTOR.to_string()]
        } else {
            self.motor_names
        };

        let mut motors: Vec<Motor> = Vec::with_capacity(names.len());
        for name in names {
            if motors.iter().any(|m| m.name() == name) {
                return Err(SimError::DuplicateMotor { name });
            }
            motors.push(Motor::new(name));
        }

        let assembly = Assembly {
            board: Board::new(),
            motors,
        };
        assembly.log_created();
        Ok(assembly)
    }
}
