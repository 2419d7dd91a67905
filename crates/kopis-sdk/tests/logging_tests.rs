//! 日志初始化测试
//!
//! 全局订阅者每个进程只能安装一次，因此本文件只有一个测试。

use kopis_sdk::{DEFAULT_LOG_DIRECTIVES, init_logger, init_logger_with};

#[test]
fn logger_installs_once_and_bridges_log() {
    assert_eq!(DEFAULT_LOG_DIRECTIVES, "kopis=info");
    assert!(init_logger_with("kopis=trace"));
    assert!(!init_logger());

    // log 宏在桥接之后可以正常调用
    log::info!(target: "kopis_sdk", "bridged log record");
    tracing::info!("native tracing event");

    // 开启 trace 后引擎的逐步日志路径也能正常执行
    let assembly = kopis_sdk::Assembly::new();
    let motor = assembly.motors().next().unwrap();
    motor.rotate_shaft_angle(15.0, 5.0).unwrap();
    assert_eq!(motor.shaft_angle(), 15.0);
}
