//! 变更通知（Change Notification）
//!
//! 每个引脚、每个电机各持有一个 [`NotifySlot`]：最多一个订阅者，后设置者覆盖先设置者。
//!
//! # 调度约定
//!
//! - **同步**: 回调在触发它的 `set_*` 调用内部、于调用者线程上执行，返回前完成
//! - **可重入**: 触发回调时不持有任何锁，回调可以修改其他引脚/电机，甚至替换自身
//! - **先提交后通知**: 状态先写入再通知；回调 panic 时 panic 传播给调用者，已提交的状态不回滚
//! - **无深度保护**: 回调修改触发它的同一对象会递归触发，由调用者负责终止
//!
//! # 使用示例
//!
//! ```rust
//! use kopis_sim::hooks::NotifySlot;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! let slot: NotifySlot<u32> = NotifySlot::new();
//! let count = Arc::new(AtomicU64::new(0));
//!
//! let counter = count.clone();
//! slot.set(move |_value: &u32| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! slot.notify(&7);
//! assert_eq!(count.load(Ordering::Relaxed), 1);
//! ```

use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// 变更回调 Trait
///
/// 任何 `Fn(&T) + Send + Sync` 闭包都自动实现此 trait。
pub trait ChangeCallback<T: ?Sized>: Send + Sync {
    /// 状态提交后调用，`source` 是发生变化的引脚或电机
    fn on_change(&self, source: &T);
}

impl<T: ?Sized, F> ChangeCallback<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn on_change(&self, source: &T) {
        self(source)
    }
}

type SharedCallback<T> = Box<dyn ChangeCallback<T>>;

/// 单订阅者回调槽
///
/// 使用 `ArcSwapOption` 存放回调：`notify` 先取出一份 `Arc` 再调用，
/// 因此回调执行期间槽位不被占用，回调内部调用 `set`/`clear` 是安全的。
pub struct NotifySlot<T: ?Sized> {
    callback: ArcSwapOption<SharedCallback<T>>,
}

impl<T: ?Sized> NotifySlot<T> {
    /// 创建空槽位
    #[must_use]
    pub fn new() -> Self {
        Self {
            callback: ArcSwapOption::empty(),
        }
    }

    /// 设置订阅者（替换已有订阅者）
    pub fn set<C>(&self, callback: C)
    where
        C: ChangeCallback<T> + 'static,
    {
        self.callback.store(Some(Arc::new(Box::new(callback))));
    }

    /// 移除订阅者
    pub fn clear(&self) {
        self.callback.store(None);
    }

    /// 是否已设置订阅者
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.callback.load().is_some()
    }

    /// 通知订阅者（未设置时为空操作）
    pub fn notify(&self, source: &T) {
        if let Some(callback) = self.callback.load_full() {
            callback.on_change(source);
        }
    }
}

impl<T: ?Sized> Default for NotifySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for NotifySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifySlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}
