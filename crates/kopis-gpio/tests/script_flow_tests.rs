//! 脚本接口集成测试
//!
//! 按典型控制脚本的顺序调用：选择编号、配置、输出、转动电机、清理，
//! 并通过录制器核对仿真层观察到的状态变化。

use kopis_gpio::{Channel, Direction, Gpio, GpioError, MountType, Numbering};
use kopis_sim::recording::{Transition, TransitionRecorder};
use kopis_sim::{HORIZONTAL_MOTOR, PinLevel, PinMode, VERTICAL_MOTOR};

#[test]
fn blink_script_produces_expected_transitions() {
    let gpio = Gpio::new();
    let (recorder, rx) = TransitionRecorder::new();
    recorder.attach(gpio.assembly());

    gpio.set_numbering(Numbering::Board).unwrap();
    gpio.setup(12, Direction::Out, Some(PinLevel::Low)).unwrap();
    for _ in 0..3 {
        gpio.output(12, PinLevel::High).unwrap();
        gpio.output(12, PinLevel::Low).unwrap();
    }
    gpio.cleanup(None).unwrap();

    let states: Vec<(Option<PinMode>, Option<PinLevel>)> = rx
        .try_iter()
        .filter_map(|t| t.as_pin().map(|p| (p.mode, p.state)))
        .collect();

    // setup: OUTPUT + LOW，三次翻转，cleanup 时已为 LOW 只回到 OFF
    assert_eq!(states.len(), 2 + 6 + 1);
    assert_eq!(states[0], (Some(PinMode::Output), Some(PinLevel::Low)));
    assert_eq!(states[2], (Some(PinMode::Output), Some(PinLevel::High)));
    assert_eq!(*states.last().unwrap(), (Some(PinMode::Off), Some(PinLevel::Low)));
}

#[test]
fn special_pin_through_alt_and_back() {
    let gpio = Gpio::new();
    gpio.set_numbering(Numbering::Soc).unwrap();

    // ALT 不是脚本接口的方向，直接在引脚上切换
    let pin = gpio.resolve(&Channel::from("PH5")).unwrap();
    pin.set_mode(PinMode::Alt).unwrap();
    assert_eq!(gpio.assembly().board().pin(19).unwrap().mode(), Ok(PinMode::Alt));

    gpio.setup("PH5", Direction::Out, Some(PinLevel::High)).unwrap();
    assert_eq!(gpio.input("PH5"), Ok(PinLevel::High));
    gpio.cleanup(Some(Channel::from("PH5"))).unwrap();
    assert_eq!(pin.mode(), Ok(PinMode::Off));
}

#[test]
fn numbering_rules() {
    let gpio = Gpio::new();
    assert_eq!(gpio.input(12), Err(GpioError::NumberingNotSet));

    gpio.set_numbering(Numbering::Board).unwrap();
    assert!(gpio.set_numbering(Numbering::Soc).is_err());
    assert!(matches!(
        gpio.setup("PD18", Direction::Out, None),
        Err(GpioError::ChannelKindMismatch { .. })
    ));
}

#[test]
fn motor_script() {
    let gpio = Gpio::new();
    let (recorder, rx) = TransitionRecorder::new();
    recorder.attach(gpio.assembly());
    let motors = gpio.motors();

    motors.move_degrees(VERTICAL_MOTOR, 58.0, 1.0).unwrap();
    assert_eq!(rx.try_iter().count(), 58);

    motors.move_degrees(VERTICAL_MOTOR, -58.0, 4.0).unwrap();
    // 14 个整步 + 2° 余步
    assert_eq!(rx.try_iter().count(), 15);
    assert_eq!(motors.angle(VERTICAL_MOTOR).unwrap(), 0.0);

    motors.move_degrees(HORIZONTAL_MOTOR, 350.0, 6.0).unwrap();
    let last = rx.try_iter().last().unwrap();
    assert_eq!(last, Transition::Motor(kopis_sim::MotorSnapshot {
        name: HORIZONTAL_MOTOR.to_string(),
        angle: 350.0,
    }));

    motors.move_degrees(HORIZONTAL_MOTOR, 50.0, 3.0).unwrap();
    assert_eq!(motors.angle(HORIZONTAL_MOTOR).unwrap(), 40.0);

    motors.setup_by_mount_type(MountType::Eq).unwrap();
    assert_eq!(motors.angle(HORIZONTAL_MOTOR).unwrap(), 0.0);
    assert_eq!(motors.angle(VERTICAL_MOTOR).unwrap(), 58.0);

    motors.reset_all().unwrap();
    assert_eq!(motors.angle(VERTICAL_MOTOR).unwrap(), 0.0);
}
