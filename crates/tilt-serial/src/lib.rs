//! # Tilt Serial Adapter Layer
//!
//! 串口硬件抽象层，把字节流转换为「行」，上层只关心一次 `receive()` 拿到一帧候选数据。

use std::time::Duration;
use thiserror::Error;

pub mod port;

pub use port::SerialPortAdapter;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockSerialAdapter;

/// 串口适配层统一错误类型
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(String),
    #[error("Read timeout")]
    Timeout,
    #[error("Device disconnected")]
    Disconnected,
}

impl SerialError {
    /// 超时之外的错误都意味着设备不可用
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SerialError::Timeout)
    }
}

/// 行式串口适配器
///
/// `receive()` 阻塞至多一个读超时，返回一行（含结束符 `\n`）或 `SerialError::Timeout`。
/// 超时会丢弃尚未凑满的残行。返回的行不保证是合法帧，解析交给协议层。
pub trait SerialAdapter {
    fn receive(&mut self) -> Result<Vec<u8>, SerialError>;
    fn set_receive_timeout(&mut self, _timeout: Duration) {}
}

impl<T: SerialAdapter + ?Sized> SerialAdapter for Box<T> {
    fn receive(&mut self) -> Result<Vec<u8>, SerialError> {
        (**self).receive()
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        (**self).set_receive_timeout(timeout)
    }
}
