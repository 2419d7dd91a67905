//! demo 命令
//!
//! 两个演示程序：GPIO 引脚切换、两轴电机转动。
//! 每次状态变化都由挂在装配体上的回调记录到日志。

use anyhow::Result;
use clap::{Args, Subcommand};
use kopis_sdk::gpio::Gpio;
use kopis_sdk::prelude::{Assembly, Motor, Pin, PinLevel, PinMode};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::config::CliConfig;

/// 节奏基准：GPIO 演示中最长的一次停顿（毫秒）
const PACE_BASE_MS: u64 = 200;

/// 演示命令
#[derive(Subcommand, Debug)]
pub enum DemoCommand {
    /// GPIO / SPECIAL 引脚切换演示
    Gpio(DemoArgs),

    /// 水平 / 垂直轴电机演示
    Motors(DemoArgs),
}

/// 演示参数
#[derive(Args, Debug, Clone, Default)]
pub struct DemoArgs {
    /// 节奏单位（毫秒，覆盖配置），0 表示不等待
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// 演示结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoReport {
    /// 回调观察到的状态变化次数
    pub transitions: u64,
    pub elapsed: Duration,
}

impl DemoCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let gpio = config.build_gpio()?;
        let report = match self {
            DemoCommand::Gpio(args) => {
                let pacer = Pacer::new(args.delay_ms.unwrap_or(config.demo.step_delay_ms));
                run_gpio_demo(&gpio, pacer).await?
            },
            DemoCommand::Motors(args) => {
                let pacer = Pacer::new(args.delay_ms.unwrap_or(config.demo.step_delay_ms));
                run_motor_demo(&gpio, pacer).await?
            },
        };

        println!();
        gpio.assembly().board().print_pins();
        println!(
            "✅ 演示完成: {} 次状态变化，耗时 {:.2} 秒",
            report.transitions,
            report.elapsed.as_secs_f64()
        );
        Ok(())
    }
}

/// 演示节奏
///
/// `step_delay_ms` 对应 [`PACE_BASE_MS`]，其余停顿按比例缩放。
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    step_delay_ms: u64,
}

impl Pacer {
    pub fn new(step_delay_ms: u64) -> Self {
        Self { step_delay_ms }
    }

    /// 不等待
    pub fn immediate() -> Self {
        Self::new(0)
    }

    fn scaled(&self, base_ms: u64) -> Duration {
        Duration::from_millis(base_ms.saturating_mul(self.step_delay_ms) / PACE_BASE_MS)
    }

    async fn pause(&self, base_ms: u64) {
        let duration = self.scaled(base_ms);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// 状态变化日志
///
/// 为每个引脚和电机注册回调：写一条 `info!` 并计数。
#[derive(Debug, Clone, Default)]
struct TransitionLog {
    count: Arc<AtomicU64>,
}

impl TransitionLog {
    fn attach(&self, assembly: &Assembly) {
        for pin in assembly.board().pins() {
            let count = self.count.clone();
            pin.set_on_change(move |pin: &Pin| {
                count.fetch_add(1, Ordering::Relaxed);
                let snapshot = pin.snapshot();
                tracing::info!(
                    pin = snapshot.board_number,
                    name = pin.name(),
                    mode = ?snapshot.mode,
                    state = ?snapshot.state,
                    "pin transition"
                );
            });
        }
        for motor in assembly.motors() {
            let count = self.count.clone();
            motor.set_on_change(move |motor: &Motor| {
                count.fetch_add(1, Ordering::Relaxed);
                tracing::info!(motor = motor.name(), angle = motor.shaft_angle(), "motor transition");
            });
        }
    }

    fn detach(&self, assembly: &Assembly) {
        for pin in assembly.board().pins() {
            pin.clear_on_change();
        }
        for motor in assembly.motors() {
            motor.clear_on_change();
        }
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// GPIO 演示
///
/// 12 / 15 输出、11 输入、19 / 21 / 23 先 ALT 再作为输出快速切换，最后全部关闭。
pub async fn run_gpio_demo(gpio: &Gpio, pacer: Pacer) -> Result<DemoReport> {
    let assembly = gpio.assembly();
    let board = assembly.board();
    let log = TransitionLog::default();
    log.attach(assembly);
    let start = Instant::now();

    println!("[DEMO] GPIO 引脚演示开始");

    println!("[DEMO] GPIO 引脚设为 OUTPUT");
    let pin12 = board.pin(12)?;
    pin12.set_mode(PinMode::Output)?;
    let pin15 = board.pin_by_soc_name("PL10")?;
    pin15.set_mode(PinMode::Output)?;

    println!("[DEMO] 测量引脚切换耗时:");
    for _ in 0..15 {
        let toggle_start = Instant::now();
        pin12.set_state(PinLevel::High)?;
        println!("-> {} µs", toggle_start.elapsed().as_micros());
        pin12.set_state(PinLevel::Low)?;
    }

    println!("[DEMO] GPIO 引脚设为 INPUT");
    let pin11 = board.pin(11)?;
    pin11.set_mode(PinMode::Input)?;

    println!("[DEMO] SPECIAL 引脚设为 ALT");
    let specials = [board.pin(19)?, board.pin(21)?, board.pin(23)?];
    for pin in specials {
        pin.set_mode(PinMode::Alt)?;
    }

    println!("[DEMO] 以递增的速度切换 GPIO 引脚");
    for pause_ms in (0..=PACE_BASE_MS).rev().step_by(10) {
        for (pin, toggles) in [(pin12, 1), (pin15, 2)] {
            for _ in 0..toggles {
                pin.set_state(PinLevel::High)?;
                pacer.pause(pause_ms).await;
                pin.set_state(PinLevel::Low)?;
                pacer.pause(pause_ms).await;
            }
        }
    }

    println!("[DEMO] 关闭 GPIO 引脚");
    for pin in [pin12, pin15, pin11] {
        pin.set_mode(PinMode::Off)?;
    }

    println!("[DEMO] SPECIAL 引脚设为 OUTPUT");
    for pin in specials {
        pin.set_mode(PinMode::Output)?;
    }

    println!("[DEMO] 以最高速度切换 SPECIAL 引脚");
    for _ in 0..20 {
        for pin in specials {
            pin.set_state(PinLevel::High)?;
            pin.set_state(PinLevel::Low)?;
        }
    }

    println!("[DEMO] 关闭 SPECIAL 引脚");
    for pin in specials {
        pin.set_mode(PinMode::Off)?;
    }

    log.detach(assembly);
    println!("[DEMO] GPIO 引脚演示结束");
    Ok(DemoReport {
        transitions: log.count(),
        elapsed: start.elapsed(),
    })
}

/// 电机演示
///
/// 垂直轴指向极轴并返回，两轴分别转动，再交替转动，最后回到 0°。
pub async fn run_motor_demo(gpio: &Gpio, pacer: Pacer) -> Result<DemoReport> {
    let assembly = gpio.assembly();
    let log = TransitionLog::default();
    log.attach(assembly);
    let start = Instant::now();

    let horizontal = gpio.motors().horizontal()?;
    let vertical = gpio.motors().vertical()?;

    println!("[DEMO] 电机演示开始");

    let phases: [(&str, &Motor, f64, f64, u64); 6] = [
        ("指向极轴", vertical, 58.0, 1.0, 3000),
        ("回到初始位置", vertical, -58.0, 4.0, 2000),
        ("转动垂直轴", vertical, -30.0, 3.0, 2000),
        ("转动垂直轴", vertical, 50.0, 4.0, 2000),
        ("转动水平轴", horizontal, 350.0, 6.0, 2000),
        ("转动水平轴", horizontal, 50.0, 3.0, 2000),
    ];
    for (label, motor, angle, speed, pause_ms) in phases {
        println!("[DEMO] {}（{:+}°，每步 {}°）", label, angle, speed);
        motor.rotate_shaft_angle(angle, speed)?;
        pacer.pause(pause_ms).await;
    }

    println!("[DEMO] 两轴交替以不同速度转动");
    let interleaved: [(&Motor, f64, f64); 6] = [
        (horizontal, -40.0, 2.0),
        (vertical, 10.0, 2.0),
        (horizontal, -200.0, 5.0),
        (vertical, -20.0, 3.0),
        (horizontal, 20.0, 1.0),
        (vertical, 60.0, 4.0),
    ];
    for (motor, angle, speed) in interleaved {
        motor.rotate_shaft_angle(angle, speed)?;
    }
    pacer.pause(4000).await;

    println!("[DEMO] 电机回到初始位置");
    horizontal.set_shaft_angle(0.0)?;
    vertical.set_shaft_angle(0.0)?;

    log.detach(assembly);
    println!("[DEMO] 电机演示结束");
    Ok(DemoReport {
        transitions: log.count(),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kopis_sdk::sim::{HORIZONTAL_MOTOR, VERTICAL_MOTOR};

    #[test]
    fn test_pacer_scaling() {
        let pacer = Pacer::new(20);
        assert_eq!(pacer.scaled(200), Duration::from_millis(20));
        assert_eq!(pacer.scaled(3000), Duration::from_millis(300));
        assert_eq!(pacer.scaled(0), Duration::ZERO);
        assert_eq!(Pacer::immediate().scaled(4000), Duration::ZERO);
    }

    #[test]
    fn test_pacer_huge_delay_saturates() {
        let pacer = Pacer::new(u64::MAX);
        assert_eq!(pacer.scaled(4000), Duration::from_millis(u64::MAX / PACE_BASE_MS));
        assert_eq!(pacer.scaled(0), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_gpio_demo_transitions() {
        let gpio = Gpio::new();
        let report = run_gpio_demo(&gpio, Pacer::immediate()).await.unwrap();

        // 2 + 30 + 1 + 3 + 21 * 6 + 3 + 3 + 20 * 6 + 3
        assert_eq!(report.transitions, 291);

        let board = gpio.assembly().board();
        for n in [11, 12, 15, 19, 21, 23] {
            assert_eq!(board.pin(n).unwrap().mode(), Ok(PinMode::Off), "pin {}", n);
        }
        for n in [12, 15, 19, 21, 23] {
            assert_eq!(board.pin(n).unwrap().state(), Ok(PinLevel::Low), "pin {}", n);
        }
        assert!(!board.pin(12).unwrap().has_on_change());
    }

    #[tokio::test]
    async fn test_motor_demo_transitions() {
        let gpio = Gpio::new();
        let report = run_motor_demo(&gpio, Pacer::immediate()).await.unwrap();

        // 58 + 15 + 10 + 13 + 59 + 17 + 20 + 5 + 40 + 7 + 20 + 15 + 2
        assert_eq!(report.transitions, 281);
        assert_eq!(gpio.motors().angle(HORIZONTAL_MOTOR).unwrap(), 0.0);
        assert_eq!(gpio.motors().angle(VERTICAL_MOTOR).unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_execute_with_default_config() {
        let command = DemoCommand::Motors(DemoArgs { delay_ms: Some(0) });
        command.execute(&CliConfig::default()).await.unwrap();
    }
}
