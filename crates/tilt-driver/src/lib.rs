//! 驱动层模块
//!
//! 把噪声很大的加速度采样流变成限速、去抖后的屏幕旋转命令序列：
//! - 倾角估计（`angle`）
//! - 平滑窗口（`window`）：最近 3 个倾角的均值作为基线
//! - 双阈值门限（`gate`）
//! - 交替限流（`limiter`）
//! - 仿射矩阵构造（`transform`）与外部命令下发（`emitter`）
//! - 主循环（`pipeline`）与指标（`metrics`）
//!
//! # 使用场景
//!
//! 单设备、单线程：一个 [`Pipeline`] 独占串口适配器、下发器和全部循环状态。

pub mod angle;
pub mod emitter;
mod error;
pub mod gate;
pub mod limiter;
pub mod metrics;
pub mod pipeline;
pub mod transform;
pub mod window;

pub use angle::{ANGLE_EPSILON, estimate_angle};
pub use emitter::{TransformEmitter, XrandrEmitter};
pub use error::{DriverError, EmitError};
pub use gate::{GateConfig, GateDecision, GateMode, TriggerGate};
pub use limiter::{RateDecision, RateLimiter};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use pipeline::{Pipeline, PipelineConfig, PipelineState, StepOutcome};
pub use transform::Transform;
pub use window::SmoothingWindow;
