//! 主循环指标模块
//!
//! 原子计数器，主循环线程写，任意线程（如 Ctrl-C 之后的主线程）读，不引入锁。

use std::sync::atomic::{AtomicU64, Ordering};

/// 主循环实时指标
///
/// # 使用示例
///
/// ```rust
/// use tilt_driver::PipelineMetrics;
/// use std::sync::Arc;
/// use std::sync::atomic::Ordering;
///
/// let metrics = Arc::new(PipelineMetrics::default());
/// metrics.frames_total.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.frames_total, 1);
/// ```
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    /// 收到的行数（含坏帧）
    pub frames_total: AtomicU64,

    /// 解析失败被丢弃的行数
    pub frames_malformed: AtomicU64,

    /// 读超时次数（无数据时的正常现象）
    pub rx_timeouts: AtomicU64,

    /// 门限触发次数
    pub gate_fired: AtomicU64,

    /// 实际下发的变换次数
    pub emitted: AtomicU64,

    /// 被交替限流压下的触发次数
    pub suppressed: AtomicU64,

    /// 未过门限的帧数
    pub skipped_noisy: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_total: self.frames_total.load(Ordering::Relaxed),
            frames_malformed: self.frames_malformed.load(Ordering::Relaxed),
            rx_timeouts: self.rx_timeouts.load(Ordering::Relaxed),
            gate_fired: self.gate_fired.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            skipped_noisy: self.skipped_noisy.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.frames_total.store(0, Ordering::Relaxed);
        self.frames_malformed.store(0, Ordering::Relaxed);
        self.rx_timeouts.store(0, Ordering::Relaxed);
        self.gate_fired.store(0, Ordering::Relaxed);
        self.emitted.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.skipped_noisy.store(0, Ordering::Relaxed);
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub frames_total: u64,
    pub frames_malformed: u64,
    pub rx_timeouts: u64,
    pub gate_fired: u64,
    pub emitted: u64,
    pub suppressed: u64,
    pub skipped_noisy: u64,
}

impl MetricsSnapshot {
    /// 坏帧率（百分比），`frames_total` 为 0 时返回 0.0
    pub fn malformed_rate(&self) -> f64 {
        if self.frames_total == 0 {
            return 0.0;
        }
        (self.frames_malformed as f64 / self.frames_total as f64) * 100.0
    }
}
