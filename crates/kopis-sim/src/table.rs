//! 引脚表渲染
//!
//! 奇数引脚在左、偶数引脚在右，与物理双列排针一致。只读，不修改任何状态。

use crate::board::Board;
use crate::mode::PinMode;
use crate::pin::Pin;
use std::fmt;

const FRAME_OUTER: &str =
    "+------+-------+----------+------+---+  #KOPIS  +---+------+----------+-------+------+";
const FRAME_INNER: &str =
    "+------+-------+----------+------+---+----++----+---+------+----------+-------+------+";
const HEADER: &str =
    "| GPIO |  SoC  |   Name   | Mode | V | ~Virtual | V | Mode |   Name   |  SoC  | GPIO |";

/// 引脚表（实现 `Display`）
pub struct PinTable<'a> {
    board: &'a Board,
}

/// 一个引脚在表中的各列
struct PinCells {
    gpio: String,
    soc: &'static str,
    name: &'static str,
    mode: &'static str,
    value: &'static str,
}

impl PinCells {
    fn of(pin: &Pin) -> Self {
        let snapshot = pin.snapshot();
        let value = match (snapshot.mode, snapshot.state) {
            (Some(PinMode::Alt), _) => "-",
            (_, Some(level)) if level.is_high() => "1",
            (_, Some(_)) => "0",
            (_, None) => "",
        };

        Self {
            gpio: pin.gpio_number().map(|n| n.to_string()).unwrap_or_default(),
            soc: pin.soc_name().unwrap_or(""),
            name: pin.name(),
            mode: snapshot.mode.map(PinMode::short_label).unwrap_or(""),
            value,
        }
    }
}

impl<'a> PinTable<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }
}

impl fmt::Display for PinTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FRAME_OUTER}")?;
        writeln!(f, "{HEADER}")?;
        writeln!(f, "{FRAME_INNER}")?;

        let pins: Vec<&Pin> = self.board.pins().collect();
        for pair in pins.chunks(2) {
            let left = PinCells::of(pair[0]);
            write!(
                f,
                "| {:>4} | {:>5} | {:>8} | {:>4} | {:>1} | {:>2} ||",
                left.gpio,
                left.soc,
                left.name,
                left.mode,
                left.value,
                pair[0].board_number()
            )?;

            match pair.get(1) {
                Some(right_pin) => {
                    let right = PinCells::of(right_pin);
                    writeln!(
                        f,
                        " {:<2} | {:<1} | {:<4} | {:<8} | {:<5} | {:<4} |",
                        right_pin.board_number(),
                        right.value,
                        right.mode,
                        right.name,
                        right.soc,
                        right.gpio
                    )?;
                },
                None => writeln!(f)?,
            }
        }

        writeln!(f, "{FRAME_INNER}")?;
        writeln!(f, "{HEADER}")?;
        writeln!(f, "{FRAME_OUTER}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::PinLevel;

    #[test]
    fn test_table_shape() {
        let board = Board::new();
        let text = board.table().to_string();
        let lines: Vec<&str> = text.lines().collect();
        // 3 行表头 + 13 行数据 + 3 行表尾
        assert_eq!(lines.len(), 19);
        assert!(lines[0].contains("#KOPIS"));
        assert!(lines[1].contains("~Virtual"));
        assert!(lines.iter().all(|l| l.len() == FRAME_OUTER.len()));
    }

    #[test]
    fn test_power_row() {
        let board = Board::new();
        let text = board.table().to_string();
        let row = text.lines().nth(3).unwrap();
        assert_eq!(
            row,
            "|      |       |     3.3V |      |   |  1 || 2  |   |      | 5V       |       |      |"
        );
    }

    #[test]
    fn test_row_reflects_state() {
        let board = Board::new();
        let pin = board.pin(12).unwrap();
        pin.set_mode(PinMode::Output).unwrap();
        pin.set_state(PinLevel::High).unwrap();
        board.pin(11).unwrap().set_mode(PinMode::Alt).unwrap();

        let text = board.table().to_string();
        let row = text.lines().nth(8).unwrap();
        assert_eq!(
            row,
            "|  120 |  PD24 |    RXD.3 |  ALT | - | 11 || 12 | 1 | OUT  | PD18     | PD18  | 114  |"
        );
    }
}
