//! 板卡引脚注册表
//!
//! 持有 26 个引脚，按物理编号顺序排列，构造后成员不再变化。

use crate::error::{PinKey, Result, SimError};
use crate::layout::{ORANGE_PI_3_LTS, ORANGE_PI_3_LTS_MODEL, PinSpec};
use crate::pin::Pin;
use crate::table::PinTable;

/// 虚拟 Orange Pi 3 LTS 板卡
#[derive(Debug)]
pub struct Board {
    model: &'static str,
    pins: Vec<Pin>,
}

impl Board {
    /// 按 Orange Pi 3 LTS 布局创建板卡，所有引脚为 OFF / LOW
    pub fn new() -> Self {
        Self::from_layout(ORANGE_PI_3_LTS_MODEL, &ORANGE_PI_3_LTS)
    }

    fn from_layout(model: &'static str, layout: &[PinSpec]) -> Self {
        Self {
            model,
            pins: layout.iter().map(Pin::from_spec).collect(),
        }
    }

    /// 型号名称
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// 按物理编号查找引脚
    ///
    /// # 错误
    ///
    /// 编号不在 1..=26 时返回 [`SimError::PinNotFound`]。
    pub fn pin(&self, board_number: u8) -> Result<&Pin> {
        self.pins
            .iter()
            .find(|pin| pin.board_number() == board_number)
            .ok_or(SimError::PinNotFound(PinKey::BoardNumber(board_number)))
    }

    /// 按 SoC 名称查找引脚（只在 GPIO / SPECIAL 中查找，区分大小写）
    pub fn pin_by_soc_name(&self, soc_name: &str) -> Result<&Pin> {
        self.pins
            .iter()
            .find(|pin| pin.soc_name() == Some(soc_name))
            .ok_or_else(|| SimError::PinNotFound(PinKey::SocName(soc_name.to_string())))
    }

    /// 全部引脚，物理编号升序
    ///
    /// 每次调用都从头开始，不消耗任何内部状态。
    pub fn pins(&self) -> impl ExactSizeIterator<Item = &Pin> + '_ {
        self.pins.iter()
    }

    /// 引脚数量
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// 仿照物理排针的双列引脚表
    pub fn table(&self) -> PinTable<'_> {
        PinTable::new(self)
    }

    /// 将引脚表打印到标准输出
    pub fn print_pins(&self) {
        print!("{}", self.table());
    }

    /// 所有 GPIO / SPECIAL 引脚回到 OFF
    ///
    /// OUTPUT 且为 HIGH 的引脚先拉低。只有实际变化的引脚会触发通知。
    /// 返回发生变化的引脚数量。
    pub fn reset(&self) -> Result<usize> {
        let mut changed = 0;
        for pin in &self.pins {
            if pin.reset()? {
                changed += 1;
            }
        }
        tracing::debug!(changed, "board reset");
        Ok(changed)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
