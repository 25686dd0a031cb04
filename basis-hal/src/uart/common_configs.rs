//! Frequently used [`UartConfig`]s

use super::{DataBits, StopBits, UartConfig};
use fugit::HertzU32;

const fn n81(baudrate: u32) -> UartConfig {
    UartConfig::new(
        HertzU32::from_raw(baudrate),
        DataBits::Eight,
        None,
        StopBits::One,
    )
}

/// 9600 baud, 8 data bits, no parity, 1 stop bit
pub const _9600_8_N_1: UartConfig = n81(9_600);

/// 19200 baud, 8 data bits, no parity, 1 stop bit
pub const _19200_8_N_1: UartConfig = n81(19_200);

/// 38400 baud, 8 data bits, no parity, 1 stop bit
pub const _38400_8_N_1: UartConfig = n81(38_400);

/// 57600 baud, 8 data bits, no parity, 1 stop bit
pub const _57600_8_N_1: UartConfig = n81(57_600);

/// 115200 baud, 8 data bits, no parity, 1 stop bit
pub const _115200_8_N_1: UartConfig = n81(115_200);
