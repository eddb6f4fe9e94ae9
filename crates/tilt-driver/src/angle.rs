//! 倾角估计

use tilt_protocol::RawSample;

/// 加在倾角上的极小常量，避免倾角恰好为 0 时后续比值计算退化
pub const ANGLE_EPSILON: f64 = 1e-5;

/// 由加速度分量估计屏幕倾角（弧度）
///
/// `angle = atan2(x, y) + ε`，`z` 不参与计算。
/// 对任意 `i32` 输入都有定义，输出有限。
pub fn estimate_angle(sample: &RawSample) -> f64 {
    (sample.x as f64).atan2(sample.y as f64) + ANGLE_EPSILON
}
