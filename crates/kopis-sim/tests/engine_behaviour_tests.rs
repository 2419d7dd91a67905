//! 仿真引擎集成测试
//!
//! 覆盖：
//! - 板卡编号与查找
//! - 各类引脚的模式 / 电平合法性
//! - 回调的同步、可重入与 panic 语义
//! - 电机分步转动的通知序列

use kopis_sim::recording::{Transition, TransitionRecorder};
use kopis_sim::{
    Assembly, HORIZONTAL_MOTOR, Motor, Pin, PinKey, PinLevel, PinMode, PinType, SimError,
    VERTICAL_MOTOR,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn gpio_pins(assembly: &Assembly) -> impl Iterator<Item = &Pin> {
    assembly.board().pins().filter(|p| p.pin_type() == PinType::Gpio)
}

fn special_pins(assembly: &Assembly) -> impl Iterator<Item = &Pin> {
    assembly.board().pins().filter(|p| p.pin_type() == PinType::Special)
}

#[test]
fn board_numbers_are_stable_and_ascending() {
    let assembly = Assembly::new();
    let first: Vec<u8> = assembly.board().pins().map(Pin::board_number).collect();
    let second: Vec<u8> = assembly.board().pins().map(Pin::board_number).collect();
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(first.len(), 26);
}

#[test]
fn lookups_fail_with_not_found() {
    let assembly = Assembly::new();
    assert_eq!(
        assembly.board().pin(99).unwrap_err(),
        SimError::PinNotFound(PinKey::BoardNumber(99))
    );
    assert!(matches!(
        assembly.board().pin_by_soc_name("NOPE"),
        Err(SimError::PinNotFound(PinKey::SocName(name))) if name == "NOPE"
    ));
}

#[test]
fn alt_fails_on_every_plain_gpio_pin() {
    let assembly = Assembly::new();
    let mut checked = 0;
    for pin in gpio_pins(&assembly) {
        assert!(matches!(
            pin.set_mode(PinMode::Alt),
            Err(SimError::InvalidMode { .. })
        ));
        assert_eq!(pin.mode(), Ok(PinMode::Off));
        checked += 1;
    }
    assert_eq!(checked, 8);
}

#[test]
fn all_modes_succeed_on_every_special_pin() {
    let assembly = Assembly::new();
    for pin in special_pins(&assembly) {
        for mode in PinMode::ALL {
            pin.set_mode(mode).unwrap();
            assert_eq!(pin.mode(), Ok(mode));
        }
    }
}

#[test]
fn set_state_succeeds_only_in_output() {
    let assembly = Assembly::new();
    for pin in gpio_pins(&assembly).chain(special_pins(&assembly)) {
        for mode in PinMode::ALL {
            if mode == PinMode::Alt && pin.pin_type() == PinType::Gpio {
                continue;
            }
            pin.set_mode(mode).unwrap();
            let result = pin.set_state(PinLevel::High);
            if mode == PinMode::Output {
                assert!(result.is_ok());
                pin.set_state(PinLevel::Low).unwrap();
            } else {
                assert!(matches!(result, Err(SimError::ModeViolation { .. })));
            }
            if mode != PinMode::Alt {
                assert_eq!(pin.state(), Ok(PinLevel::Low));
            }
        }
    }
}

#[test]
fn leaving_alt_restores_previous_state() {
    let assembly = Assembly::new();
    for pin in special_pins(&assembly) {
        pin.set_mode(PinMode::Output).unwrap();
        pin.set_state(PinLevel::High).unwrap();
        pin.set_mode(PinMode::Alt).unwrap();
        assert!(matches!(
            pin.state(),
            Err(SimError::StateUnavailable { .. })
        ));
        pin.set_mode(PinMode::Output).unwrap();
        assert_eq!(pin.state(), Ok(PinLevel::High));
    }
}

#[test]
fn pin_12_output_high_notifies_twice_with_same_pin() {
    let assembly = Assembly::new();
    let pin = assembly.board().pin(12).unwrap();
    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    pin.set_on_change(move |p: &Pin| {
        s.lock().unwrap().push(p as *const Pin as usize);
    });

    pin.set_mode(PinMode::Output).unwrap();
    pin.set_state(PinLevel::High).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|&addr| addr == pin as *const Pin as usize));
}

#[test]
fn rotation_notifies_once_per_step() {
    let assembly = Assembly::new();
    let (recorder, rx) = TransitionRecorder::new();
    recorder.attach(&assembly);

    let motor = assembly.motor(HORIZONTAL_MOTOR).unwrap();
    motor.rotate_shaft_angle(100.0, 30.0).unwrap();
    let angles: Vec<f64> = rx
        .try_iter()
        .filter_map(|t| t.as_motor().map(|m| m.angle))
        .collect();
    assert_eq!(angles, vec![30.0, 60.0, 90.0, 100.0]);

    let motor = assembly.motor(VERTICAL_MOTOR).unwrap();
    motor.rotate_shaft_angle(-30.0, 10.0).unwrap();
    let angles: Vec<f64> = rx
        .try_iter()
        .filter_map(|t| t.as_motor().map(|m| m.angle))
        .collect();
    assert_eq!(angles, vec![350.0, 340.0, 330.0]);

    motor.rotate_shaft_angle(45.0, 0.0).unwrap();
    motor.rotate_shaft_angle(45.0, -5.0).unwrap();
    assert_eq!(rx.try_iter().count(), 0);
    assert_eq!(motor.shaft_angle(), 330.0);
}

#[test]
fn callback_can_mutate_another_pin() {
    let assembly = Arc::new(Assembly::new());
    let board = assembly.board();
    board.pin(15).unwrap().set_mode(PinMode::Output).unwrap();

    // 引脚 12 的电平镜像到引脚 15
    let weak = Arc::downgrade(&assembly);
    board.pin(12).unwrap().set_on_change(move |p: &Pin| {
        let (Some(assembly), Ok(level)) = (weak.upgrade(), p.state()) else {
            return;
        };
        if let Ok(mirror) = assembly.board().pin(15) {
            let _ = mirror.set_state(level);
        }
    });

    let (recorder, rx) = TransitionRecorder::new();
    board.pin(15).unwrap().set_on_change(recorder.pin_callback());

    let source = board.pin(12).unwrap();
    source.set_mode(PinMode::Output).unwrap();
    source.set_state(PinLevel::High).unwrap();

    assert_eq!(board.pin(15).unwrap().state(), Ok(PinLevel::High));
    let mirrored: Vec<Transition> = rx.try_iter().collect();
    assert_eq!(mirrored.len(), 2);
    assert!(mirrored.iter().all(|t| t.as_pin().unwrap().board_number == 15));
}

#[test]
fn callback_can_rotate_a_motor() {
    let assembly = Arc::new(Assembly::new());
    let weak = Arc::downgrade(&assembly);
    assembly.board().pin(16).unwrap().set_on_change(move |p: &Pin| {
        if p.state() != Ok(PinLevel::High) {
            return;
        }
        if let Some(assembly) = weak.upgrade() {
            if let Ok(motor) = assembly.motor(VERTICAL_MOTOR) {
                let _ = motor.rotate_shaft_angle(10.0, 5.0);
            }
        }
    });

    let pin = assembly.board().pin(16).unwrap();
    pin.set_mode(PinMode::Output).unwrap();
    pin.set_state(PinLevel::High).unwrap();
    assert_eq!(assembly.motor(VERTICAL_MOTOR).unwrap().shaft_angle(), 10.0);
}

#[test]
fn self_mutating_callback_recurses_until_caller_stops_it() {
    let assembly = Arc::new(Assembly::new());
    let depth = Arc::new(AtomicUsize::new(0));

    let weak = Arc::downgrade(&assembly);
    let d = depth.clone();
    let motor = assembly.motor(HORIZONTAL_MOTOR).unwrap();
    motor.set_on_change(move |m: &Motor| {
        if d.fetch_add(1, Ordering::SeqCst) < 3 {
            if let Some(assembly) = weak.upgrade() {
                let _ = assembly
                    .motor(m.name())
                    .and_then(|m| m.set_shaft_angle(m.shaft_angle() + 1.0));
            }
        }
    });

    motor.set_shaft_angle(10.0).unwrap();
    assert_eq!(depth.load(Ordering::SeqCst), 4);
    assert_eq!(motor.shaft_angle(), 13.0);
}

#[test]
fn panicking_callback_keeps_committed_state() {
    let assembly = Assembly::new();
    let pin = assembly.board().pin(22).unwrap();
    pin.set_on_change(|p: &Pin| {
        if p.mode() == Ok(PinMode::Input) {
            panic!("subscriber failed");
        }
    });

    let result = catch_unwind(AssertUnwindSafe(|| pin.set_mode(PinMode::Input)));
    assert!(result.is_err());
    assert_eq!(pin.mode(), Ok(PinMode::Input));

    // 回调仍然注册，引脚仍然可用
    assert!(pin.has_on_change());
    pin.clear_on_change();
    pin.set_mode(PinMode::Output).unwrap();
}

#[test]
fn last_registered_callback_wins() {
    let assembly = Assembly::new();
    let pin = assembly.board().pin(26).unwrap();
    let first = Arc::new(AtomicU64::new(0));
    let second = Arc::new(AtomicU64::new(0));

    let c = first.clone();
    pin.set_on_change(move |_: &Pin| {
        c.fetch_add(1, Ordering::Relaxed);
    });
    let c = second.clone();
    pin.set_on_change(move |_: &Pin| {
        c.fetch_add(1, Ordering::Relaxed);
    });

    pin.set_mode(PinMode::Input).unwrap();
    assert_eq!(first.load(Ordering::Relaxed), 0);
    assert_eq!(second.load(Ordering::Relaxed), 1);
}

#[test]
fn assembly_can_be_shared_across_threads() {
    let assembly = Arc::new(Assembly::new());
    let handle = {
        let assembly = assembly.clone();
        std::thread::spawn(move || {
            assembly
                .motor(VERTICAL_MOTOR)
                .unwrap()
                .set_shaft_angle(58.0)
                .unwrap();
        })
    };
    handle.join().unwrap();
    assert_eq!(assembly.motor(VERTICAL_MOTOR).unwrap().shaft_angle(), 58.0);
}
