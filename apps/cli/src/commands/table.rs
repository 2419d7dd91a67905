//! table 命令
//!
//! 按 `--setup` 配置引脚后打印引脚表

use anyhow::{Context, Result};
use clap::Args;
use kopis_sdk::prelude::Assembly;
use kopis_sdk::sim::PinSnapshot;

use crate::validation::{PinSetup, parse_pin_setup};

/// 引脚表命令参数
#[derive(Args, Debug, Default)]
pub struct TableCommand {
    /// 引脚配置，格式 N:MODE[:LEVEL]（如 12:OUT:1、19:ALT），可重复
    #[arg(long = "setup", value_parser = parse_setup_arg)]
    pub setups: Vec<PinSetup>,

    /// 以 JSON 输出引脚快照
    #[arg(long)]
    pub json: bool,
}

fn parse_setup_arg(s: &str) -> std::result::Result<PinSetup, String> {
    parse_pin_setup(s).map_err(|err| format!("{:#}", err))
}

impl TableCommand {
    pub async fn execute(&self) -> Result<()> {
        let assembly = Assembly::new();
        apply_setups(&assembly, &self.setups)?;

        if self.json {
            let snapshots: Vec<PinSnapshot> =
                assembly.board().pins().map(|pin| pin.snapshot()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshots).context("序列化引脚快照失败")?
            );
        } else {
            assembly.board().print_pins();
        }
        Ok(())
    }
}

/// 依次应用引脚配置
pub fn apply_setups(assembly: &Assembly, setups: &[PinSetup]) -> Result<()> {
    for setup in setups {
        let pin = assembly.board().pin(setup.board_number)?;
        pin.set_mode(setup.mode)
            .with_context(|| format!("引脚 {} 无法设为 {}", setup.board_number, setup.mode))?;

        if let Some(level) = setup.level {
            pin.set_state(level)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kopis_sdk::prelude::{PinLevel, PinMode};

    #[test]
    fn test_apply_setups() {
        let assembly = Assembly::new();
        let setups = [
            parse_pin_setup("12:OUT:1").unwrap(),
            parse_pin_setup("19:ALT").unwrap(),
            parse_pin_setup("11:IN").unwrap(),
        ];
        apply_setups(&assembly, &setups).unwrap();

        let board = assembly.board();
        assert_eq!(board.pin(12).unwrap().state(), Ok(PinLevel::High));
        assert_eq!(board.pin(19).unwrap().mode(), Ok(PinMode::Alt));
        assert_eq!(board.pin(11).unwrap().mode(), Ok(PinMode::Input));

        let table = board.table().to_string();
        assert!(table.contains("| 12 | 1 | OUT  | PD18     | PD18  | 114  |"));
    }

    #[test]
    fn test_apply_setups_rejects_alt_on_gpio() {
        let assembly = Assembly::new();
        let err = apply_setups(&assembly, &[parse_pin_setup("12:ALT").unwrap()]).unwrap_err();
        assert!(format!("{:#}", err).contains("引脚 12"));
    }

    #[test]
    fn test_apply_setups_rejects_power_pin() {
        let assembly = Assembly::new();
        assert!(apply_setups(&assembly, &[parse_pin_setup("1:OUT").unwrap()]).is_err());
        assert!(apply_setups(&assembly, &[parse_pin_setup("40:OUT").unwrap()]).is_err());
    }
}
