//! 真实串口适配器
//!
//! 基于 `serialport` crate，打开设备节点（如 `/dev/ttyACM0`）并设置波特率与读超时。
//!
//! ## 限制
//!
//! - **权限要求**：Linux 上通常需要 `dialout` 组权限
//! - 串口驱动会独立缓冲字节，读取节奏不会影响数据是否丢失，只影响延迟

use crate::{SerialAdapter, SerialError};
use serialport::SerialPort;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::time::Duration;
use tilt_protocol::LineAssembler;
use tracing::{trace, warn};

/// 单次 read 的缓冲大小
const READ_CHUNK: usize = 64;

/// 串口适配器
///
/// # 示例
///
/// ```no_run
/// use std::time::Duration;
/// use tilt_serial::{SerialAdapter, SerialPortAdapter};
///
/// let mut adapter =
///     SerialPortAdapter::new("/dev/ttyACM0", 115_200, Duration::from_secs(1)).unwrap();
/// let line = adapter.receive().unwrap();
/// ```
pub struct SerialPortAdapter {
    port: Box<dyn SerialPort>,
    /// 设备路径
    path: String,
    assembler: LineAssembler,
    /// 已切好但尚未交付的行（一次 read 可能带出多行）
    pending: VecDeque<Vec<u8>>,
    read_buf: [u8; READ_CHUNK],
}

impl SerialPortAdapter {
    /// 打开串口
    ///
    /// # 错误
    /// - `SerialError::Device`: 设备不存在、权限不足或参数不被支持
    pub fn new(
        path: impl Into<String>,
        baud_rate: u32,
        read_timeout: Duration,
    ) -> Result<Self, SerialError> {
        let path = path.into();

        let port = serialport::new(&path, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|e| {
                SerialError::Device(format!("Failed to open serial device '{}': {}", path, e))
            })?;

        trace!(
            "Serial device '{}' opened at {} baud, read timeout {:?}",
            path, baud_rate, read_timeout
        );

        Ok(Self {
            port,
            path,
            assembler: LineAssembler::new(),
            pending: VecDeque::new(),
            read_buf: [0u8; READ_CHUNK],
        })
    }

}

impl SerialAdapter for SerialPortAdapter {
    fn receive(&mut self) -> Result<Vec<u8>, SerialError> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(line);
        }

        loop {
            match self.port.read(&mut self.read_buf) {
                Ok(0) => return Err(SerialError::Disconnected),
                Ok(n) => {
                    self.pending.extend(self.assembler.extend(&self.read_buf[..n]));
                    if let Some(line) = self.pending.pop_front() {
                        return Ok(line);
                    }
                },
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    if self.assembler.pending() > 0 {
                        trace!("Discarding {} partial bytes on timeout", self.assembler.pending());
                        self.assembler.clear();
                    }
                    return Err(SerialError::Timeout);
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SerialError::Io(e)),
            }
        }
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        if let Err(e) = self.port.set_timeout(timeout) {
            warn!("Failed to set read timeout on '{}': {}", self.path, e);
        }
    }
}
