//! Pipeline 主循环模块
//!
//! 单线程顺序执行：每轮一次带超时的阻塞读，同步处理，同步下发。
//!
//! ```text
//! WAITING_FRAME → PARSED → ESTIMATED → GATE_EVALUATED → EMIT | SUPPRESS | SKIP_NOISY
//!       ↑                                                        │
//!       └────────────────────────────────────────────────────────┘
//! ```
//!
//! - 读超时、坏帧：丢弃，不改动任何状态
//! - 门限未触发：倾角入历史
//! - 门限触发：交替限流决定下发或压下，之后倾角入历史
//! - 下发失败：致命，直接返回，倾角不入历史

use crate::angle::estimate_angle;
use crate::emitter::TransformEmitter;
use crate::error::DriverError;
use crate::gate::{GateConfig, GateDecision, TriggerGate};
use crate::limiter::{RateDecision, RateLimiter};
use crate::metrics::PipelineMetrics;
use crate::transform::Transform;
use crate::window::{DEFAULT_HISTORY_SEED, SmoothingWindow};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tilt_protocol::{ProtocolError, RawSample, parse_frame};
use tilt_serial::SerialAdapter;
use tracing::{debug, error, info, trace};

/// Pipeline 配置
///
/// # Example
///
/// ```
/// use tilt_driver::PipelineConfig;
///
/// // 默认：种子 0.1 rad，读超时 1s，门限 1.2 / 0.8 / 0.05
/// let config = PipelineConfig::default();
/// assert_eq!(config.receive_timeout_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// 历史窗口的初始种子倾角（弧度），必须非零
    pub history_seed: f64,
    /// 串口读超时（毫秒）
    pub receive_timeout_ms: u64,
    /// 门限配置
    pub gate: GateConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_seed: DEFAULT_HISTORY_SEED,
            receive_timeout_ms: 1000,
            gate: GateConfig::default(),
        }
    }
}

/// 单轮处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// 读超时，本轮无数据
    NoData,
    /// 坏帧，已丢弃
    Malformed(ProtocolError),
    /// 未过门限
    SkippedNoisy {
        sample: RawSample,
        decision: GateDecision,
    },
    /// 已下发
    Emitted {
        sample: RawSample,
        decision: GateDecision,
        transform: Transform,
    },
    /// 过了门限但被交替限流压下
    Suppressed {
        sample: RawSample,
        decision: GateDecision,
    },
}

impl StepOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, StepOutcome::Emitted { .. })
    }

    /// 门限是否触发（下发或压下）
    pub fn gate_fired(&self) -> bool {
        matches!(
            self,
            StepOutcome::Emitted { .. } | StepOutcome::Suppressed { .. }
        )
    }
}

/// 主循环独占的全部状态：倾角历史 + 限流标志位
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    window: SmoothingWindow,
    limiter: RateLimiter,
}

impl PipelineState {
    pub fn new(history_seed: f64) -> Self {
        Self {
            window: SmoothingWindow::new(history_seed),
            limiter: RateLimiter::new(),
        }
    }

    pub fn window(&self) -> &SmoothingWindow {
        &self.window
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// 处理收到的一行，坏帧返回 `Malformed` 且不改动状态
    pub fn process_line<E>(
        &mut self,
        line: &[u8],
        gate: &TriggerGate,
        emitter: &mut E,
    ) -> Result<StepOutcome, DriverError>
    where
        E: TransformEmitter + ?Sized,
    {
        match parse_frame(line) {
            Ok(sample) => self.process_sample(sample, gate, emitter),
            Err(e) => {
                trace!("Dropping malformed frame ({} bytes): {}", line.len(), e);
                Ok(StepOutcome::Malformed(e))
            },
        }
    }

    /// 处理一帧已解析的采样
    pub fn process_sample<E>(
        &mut self,
        sample: RawSample,
        gate: &TriggerGate,
        emitter: &mut E,
    ) -> Result<StepOutcome, DriverError>
    where
        E: TransformEmitter + ?Sized,
    {
        let angle = estimate_angle(&sample);
        let decision = gate.evaluate(angle, self.window.baseline());

        debug!(
            "Angle: {}, {}, ({}, {}, {})",
            decision.angle, decision.baseline, sample.x, sample.y, sample.z
        );

        let outcome = if !decision.fired {
            StepOutcome::SkippedNoisy { sample, decision }
        } else {
            info!(
                "Tilt changed: angle {:.4}, baseline {:.4}, ratio {:.3}",
                decision.angle, decision.baseline, decision.ratio
            );
            match self.limiter.admit() {
                RateDecision::Emit => {
                    let transform = Transform::from_angle(angle);
                    emitter.emit(&transform)?;
                    StepOutcome::Emitted {
                        sample,
                        decision,
                        transform,
                    }
                },
                RateDecision::Suppress => {
                    info!(
                        "Suppressed transform for angle {} (ratio {:.3})",
                        angle, decision.ratio
                    );
                    StepOutcome::Suppressed { sample, decision }
                },
            }
        };

        self.window.push(angle);
        Ok(outcome)
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SEED)
    }
}

/// 串口 → 下发 的完整主循环
///
/// # Example
///
/// ```no_run
/// use std::sync::atomic::AtomicBool;
/// use std::time::Duration;
/// use tilt_driver::{Pipeline, PipelineConfig, XrandrEmitter};
/// use tilt_serial::SerialPortAdapter;
///
/// let config = PipelineConfig::default();
/// let adapter = SerialPortAdapter::new(
///     "/dev/ttyACM0",
///     115_200,
///     Duration::from_millis(config.receive_timeout_ms),
/// )
/// .unwrap();
/// let mut pipeline = Pipeline::new(adapter, XrandrEmitter::new("HDMI-2"), config);
///
/// let running = AtomicBool::new(true);
/// pipeline.run(&running).unwrap();
/// ```
pub struct Pipeline<A, E> {
    adapter: A,
    emitter: E,
    gate: TriggerGate,
    state: PipelineState,
    metrics: Arc<PipelineMetrics>,
}

impl<A, E> Pipeline<A, E>
where
    A: SerialAdapter,
    E: TransformEmitter,
{
    pub fn new(mut adapter: A, emitter: E, config: PipelineConfig) -> Self {
        adapter.set_receive_timeout(Duration::from_millis(config.receive_timeout_ms));
        Self {
            adapter,
            emitter,
            gate: TriggerGate::new(config.gate),
            state: PipelineState::new(config.history_seed),
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// 共享的指标句柄
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn into_parts(self) -> (A, E) {
        (self.adapter, self.emitter)
    }

    /// 执行一轮：读一行并处理
    ///
    /// 只有串口致命错误和下发失败会返回 `Err`。
    pub fn step(&mut self) -> Result<StepOutcome, DriverError> {
        let line = match self.adapter.receive() {
            Ok(line) => line,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                self.metrics.rx_timeouts.fetch_add(1, Ordering::Relaxed);
                trace!("Serial read: {}", e);
                return Ok(StepOutcome::NoData);
            },
        };

        self.metrics.frames_total.fetch_add(1, Ordering::Relaxed);
        let outcome = self
            .state
            .process_line(&line, &self.gate, &mut self.emitter)?;
        self.record(&outcome);
        Ok(outcome)
    }

    /// 循环执行直到 `running` 被清除（正常返回）或发生致命错误
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), DriverError> {
        info!("Pipeline started");
        while running.load(Ordering::Acquire) {
            if let Err(e) = self.step() {
                error!("Pipeline stopped: {}", e);
                return Err(e);
            }
        }
        info!("Pipeline stopped by request");
        Ok(())
    }

    fn record(&self, outcome: &StepOutcome) {
        let counter = match outcome {
            StepOutcome::NoData => return,
            StepOutcome::Malformed(_) => &self.metrics.frames_malformed,
            StepOutcome::SkippedNoisy { .. } => &self.metrics.skipped_noisy,
            StepOutcome::Emitted { .. } => &self.metrics.emitted,
            StepOutcome::Suppressed { .. } => &self.metrics.suppressed,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if outcome.gate_fired() {
            self.metrics.gate_fired.fetch_add(1, Ordering::Relaxed);
        }
    }
}
