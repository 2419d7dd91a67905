//! Orange Pi 3 LTS 26 针排针布局
//!
//! 物理编号 → 名称 / SoC 名称 / GPIO 编号 / ALT 功能的固定映射。

/// 单个排针位置的功能
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    /// 电源（3.3V / 5V）
    Power,
    /// 地
    Ground,
    /// 普通 GPIO
    Gpio {
        soc_name: &'static str,
        gpio_number: u16,
    },
    /// 带复用功能的 GPIO
    Special {
        soc_name: &'static str,
        gpio_number: u16,
        alt_function: &'static str,
    },
}

/// 排针位置描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    /// 物理编号（1 起）
    pub board_number: u8,
    /// 丝印名称
    pub name: &'static str,
    pub function: PinFunction,
}

const fn power(board_number: u8, name: &'static str) -> PinSpec {
    PinSpec {
        board_number,
        name,
        function: PinFunction::Power,
    }
}

const fn ground(board_number: u8) -> PinSpec {
    PinSpec {
        board_number,
        name: "GND",
        function: PinFunction::Ground,
    }
}

const fn gpio(board_number: u8, name: &'static str, soc_name: &'static str, gpio_number: u16) -> PinSpec {
    PinSpec {
        board_number,
        name,
        function: PinFunction::Gpio {
            soc_name,
            gpio_number,
        },
    }
}

const fn special(
    board_number: u8,
    name: &'static str,
    soc_name: &'static str,
    gpio_number: u16,
    alt_function: &'static str,
) -> PinSpec {
    PinSpec {
        board_number,
        name,
        function: PinFunction::Special {
            soc_name,
            gpio_number,
            alt_function,
        },
    }
}

/// 板卡型号名称
pub const ORANGE_PI_3_LTS_MODEL: &str = "Orange Pi 3 LTS";

/// 排针数量
pub const ORANGE_PI_3_LTS_PIN_COUNT: usize = 26;

/// Orange Pi 3 LTS 排针布局（按物理编号升序）
pub const ORANGE_PI_3_LTS: [PinSpec; ORANGE_PI_3_LTS_PIN_COUNT] = [
    power(1, "3.3V"),
    power(2, "5V"),
    special(3, "SDA.0", "PD26", 122, "TWI0-SDA"),
    power(4, "5V"),
    special(5, "SCL.0", "PD25", 121, "TWI0-SCK"),
    ground(6),
    special(7, "PWM.0", "PD22", 118, "PWM0"),
    gpio(8, "PL02", "PL2", 354),
    ground(9),
    gpio(10, "PL03", "PL3", 355),
    special(11, "RXD.3", "PD24", 120, "UART3_RX"),
    gpio(12, "PD18", "PD18", 114),
    special(13, "TXD.3", "PD23", 119, "UART3_TX"),
    ground(14),
    gpio(15, "PL10", "PL10", 362),
    gpio(16, "PD15", "PD15", 111),
    power(17, "3.3V"),
    gpio(18, "PD16", "PD16", 112),
    special(19, "MOSI.1", "PH5", 229, "SPI1_MOSI"),
    ground(20),
    special(21, "MISO.1", "PH6", 230, "SPI1_MISO"),
    gpio(22, "PD21", "PD21", 117),
    special(23, "SCLK.1", "PH4", 228, "SPI1_SCLK"),
    special(24, "CE.1", "PH3", 227, "SPI1_CS"),
    ground(25),
    gpio(26, "PL08", "PL8", 360),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_layout_is_ordered_and_complete() {
        for (i, spec) in ORANGE_PI_3_LTS.iter().enumerate() {
            assert_eq!(usize::from(spec.board_number), i + 1);
        }
    }

    #[test]
    fn test_soc_names_and_gpio_numbers_unique() {
        let mut soc_names = HashSet::new();
        let mut gpio_numbers = HashSet::new();
        for spec in &ORANGE_PI_3_LTS {
            match spec.function {
                PinFunction::Gpio {
                    soc_name,
                    gpio_number,
                }
                | PinFunction::Special {
                    soc_name,
                    gpio_number,
                    ..
                } => {
                    assert!(soc_names.insert(soc_name), "duplicate {}", soc_name);
                    assert!(gpio_numbers.insert(gpio_number));
                },
                PinFunction::Power | PinFunction::Ground => {},
            }
        }
        assert_eq!(soc_names.len(), 17);
    }

    #[test]
    fn test_layout_counts() {
        let count = |pred: fn(&PinFunction) -> bool| {
            ORANGE_PI_3_LTS.iter().filter(|s| pred(&s.function)).count()
        };
        assert_eq!(count(|f| matches!(f, PinFunction::Power)), 4);
        assert_eq!(count(|f| matches!(f, PinFunction::Ground)), 5);
        assert_eq!(count(|f| matches!(f, PinFunction::Gpio { .. })), 8);
        assert_eq!(count(|f| matches!(f, PinFunction::Special { .. })), 9);
    }
}
