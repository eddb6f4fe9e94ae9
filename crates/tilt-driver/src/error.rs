//! 驱动层错误类型定义
//!
//! 坏帧（`ProtocolError`）和读超时在主循环内部消化，不会出现在这里；
//! 这里只有会终止主循环的致命错误。

use std::process::ExitStatus;
use thiserror::Error;
use tilt_serial::SerialError;

/// 外部显示命令执行错误
#[derive(Error, Debug)]
pub enum EmitError {
    /// 无法启动外部程序（不存在、无执行权限等）
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// 外部程序返回非零退出码
    #[error("Command `{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },
}

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口错误（断开、IO 错误）
    #[error("Serial error: {0}")]
    Serial(#[from] SerialError),

    /// 显示命令执行失败，不重试
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
}
