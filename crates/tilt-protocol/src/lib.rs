//! # Tilt Protocol
//!
//! 加速度计串口帧协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 帧布局常量
//! - `frame`: 帧解析与编码
//! - `assembler`: 字节流 → 行 的切分
//!
//! ## 字节序
//!
//! 设备以大端字节序（MSB 在前）写出每个 `i32` 分量，分量之间以 `,` 分隔，
//! 帧以 `\n` 结尾。字段是原始字节而不是 ASCII 数字。

pub mod assembler;
pub mod constants;
pub mod frame;

// 重新导出常用类型
pub use assembler::LineAssembler;
pub use constants::*;
pub use frame::{encode_frame, parse_frame};

use thiserror::Error;

/// 一次加速度计采样
///
/// 三个分量均为设备原始单位（mg），协议层不做任何换算。
/// `z` 仅随帧传输，倾角计算不使用它。
///
/// # 示例
///
/// ```rust
/// use tilt_protocol::{RawSample, encode_frame, parse_frame};
///
/// let sample = RawSample::new(100, -42, 5);
/// let wire = encode_frame(&sample);
/// assert_eq!(parse_frame(&wire).unwrap(), sample);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RawSample {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid delimiter at offset {offset}: 0x{found:02X}")]
    InvalidDelimiter { offset: usize, found: u8 },

    #[error("Missing line terminator")]
    MissingTerminator,
}

/// 大端字节序转 i32
pub fn bytes_to_i32_be(bytes: [u8; 4]) -> i32 {
    i32::from_be_bytes(bytes)
}

/// i32 转大端字节序
pub fn i32_to_bytes_be(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_i32_be() {
        let bytes = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(bytes_to_i32_be(bytes), 0x12345678);
    }

    #[test]
    fn test_bytes_to_i32_be_negative() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(bytes_to_i32_be(bytes), -1);
    }

    #[test]
    fn test_i32_to_bytes_be_negative() {
        assert_eq!(i32_to_bytes_be(-2), [0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::InvalidLength {
            expected: 14,
            actual: 9,
        };
        assert_eq!(
            format!("{}", err),
            "Invalid frame length: expected 14, got 9"
        );

        let err = ProtocolError::InvalidDelimiter {
            offset: 4,
            found: 0x3B,
        };
        assert_eq!(format!("{}", err), "Invalid delimiter at offset 4: 0x3B");
    }
}
