//! Mock 串口适配器
//!
//! 按脚本回放字节块、超时与断开，用于无硬件测试。超时与真实串口一样丢弃残行。脚本耗尽后返回
//! `SerialError::Disconnected`，使主循环自然结束。

use crate::{SerialAdapter, SerialError};
use std::collections::VecDeque;
use tilt_protocol::{LineAssembler, RawSample, encode_frame};

/// 脚本中的一步
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRead {
    /// 一次 read 读到的字节
    Bytes(Vec<u8>),
    /// 一次读超时
    Timeout,
    /// 设备断开
    Disconnect,
}

/// Mock 串口适配器
///
/// # 示例
///
/// ```rust
/// use tilt_protocol::RawSample;
/// use tilt_serial::{MockSerialAdapter, SerialAdapter, SerialError};
///
/// let mut adapter = MockSerialAdapter::new();
/// adapter.push_frame(&RawSample::new(1, 2, 3));
/// adapter.push_timeout();
///
/// assert!(adapter.receive().is_ok());
/// assert!(matches!(adapter.receive(), Err(SerialError::Timeout)));
/// assert!(matches!(adapter.receive(), Err(SerialError::Disconnected)));
/// ```
#[derive(Debug, Default)]
pub struct MockSerialAdapter {
    script: VecDeque<MockRead>,
    assembler: LineAssembler,
    pending: VecDeque<Vec<u8>>,
}

impl MockSerialAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一次读到的原始字节
    pub fn push_bytes(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.script.push_back(MockRead::Bytes(bytes.into()));
        self
    }

    /// 追加一帧按设备格式编码的采样
    pub fn push_frame(&mut self, sample: &RawSample) -> &mut Self {
        self.push_bytes(encode_frame(sample).to_vec())
    }

    pub fn push_timeout(&mut self) -> &mut Self {
        self.script.push_back(MockRead::Timeout);
        self
    }

    pub fn push_disconnect(&mut self) -> &mut Self {
        self.script.push_back(MockRead::Disconnect);
        self
    }

    /// 剩余脚本步数（不含已切好待交付的行）
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SerialAdapter for MockSerialAdapter {
    fn receive(&mut self) -> Result<Vec<u8>, SerialError> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(line);
        }

        loop {
            match self.script.pop_front() {
                Some(MockRead::Bytes(bytes)) => {
                    self.pending.extend(self.assembler.extend(&bytes));
                    if let Some(line) = self.pending.pop_front() {
                        return Ok(line);
                    }
                },
                Some(MockRead::Timeout) => {
                    self.assembler.clear();
                    return Err(SerialError::Timeout);
                },
                Some(MockRead::Disconnect) | None => return Err(SerialError::Disconnected),
            }
        }
    }
}
