//! 日志初始化
//!
//! `tracing` 订阅者 + `log` 桥接。`RUST_LOG` 优先，未设置时使用默认过滤规则。
//! 日志写到 stderr，stdout 留给引脚表和 JSON 输出。

use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

/// 默认过滤规则（覆盖 kopis_sim / kopis_gpio / kopis_cli）
pub const DEFAULT_LOG_DIRECTIVES: &str = "kopis=info";

/// 使用默认过滤规则初始化日志
///
/// 可以重复调用；只有第一次调用会安装全局订阅者。
pub fn init_logger() -> bool {
    init_logger_with(DEFAULT_LOG_DIRECTIVES)
}

/// 使用给定的默认过滤规则初始化日志
///
/// 返回本次调用是否安装了全局订阅者。安装成功后再把 `log` 记录转发到 `tracing`。
pub fn init_logger_with(default_directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }
    if let Err(err) = LogTracer::init() {
        tracing::debug!(%err, "log records are already routed elsewhere");
    }
    true
}
