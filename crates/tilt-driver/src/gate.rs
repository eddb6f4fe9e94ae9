//! 倾角变化门限（双阈值去抖）
//!
//! 比值阈值捕捉成比例的大幅摆动，绝对差阈值防止在倾角与基线都接近 0 时，
//! 微小的绝对变化被比值放大成误触发。所有比较均为严格不等式。

/// 比值上限
pub const RATIO_UPPER: f64 = 1.2;

/// 比值下限
pub const RATIO_LOWER: f64 = 0.8;

/// 最小绝对变化（弧度）
pub const MIN_DELTA: f64 = 0.05;

/// 两个阈值的组合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateMode {
    /// `ratio > upper || (ratio < lower && delta > min_delta)`
    ///
    /// 绝对差只约束向下的分支，向上的分支不看绝对差。
    /// 这一不对称很可能并非有意为之，但在确认之前保持原有行为。
    #[default]
    Legacy,
    /// `(ratio > upper || ratio < lower) && delta > min_delta`
    Symmetric,
}

/// 门限配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    pub ratio_upper: f64,
    pub ratio_lower: f64,
    pub min_delta: f64,
    pub mode: GateMode,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            ratio_upper: RATIO_UPPER,
            ratio_lower: RATIO_LOWER,
            min_delta: MIN_DELTA,
            mode: GateMode::Legacy,
        }
    }
}

/// 一次门限判定的结果，每帧重新计算
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateDecision {
    pub angle: f64,
    pub baseline: f64,
    /// `angle / baseline`
    pub ratio: f64,
    /// `|baseline - angle|`
    pub delta: f64,
    pub fired: bool,
}

/// 倾角变化门限
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerGate {
    config: GateConfig,
}

impl TriggerGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// 将新倾角与基线比较
    ///
    /// 基线为 0 时比值为 ±inf 或 NaN，按 IEEE 754 比较语义处理。
    pub fn evaluate(&self, angle: f64, baseline: f64) -> GateDecision {
        let ratio = angle / baseline;
        let delta = (baseline - angle).abs();
        GateDecision {
            angle,
            baseline,
            ratio,
            delta,
            fired: self.fires(ratio, delta),
        }
    }

    /// 纯判定：给定比值与绝对差是否触发
    pub fn fires(&self, ratio: f64, delta: f64) -> bool {
        let swing_up = ratio > self.config.ratio_upper;
        let swing_down = ratio < self.config.ratio_lower;
        let moved = delta > self.config.min_delta;

        match self.config.mode {
            GateMode::Legacy => swing_up || (swing_down && moved),
            GateMode::Symmetric => (swing_up || swing_down) && moved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symmetric() -> TriggerGate {
        TriggerGate::new(GateConfig {
            mode: GateMode::Symmetric,
            ..GateConfig::default()
        })
    }

    #[test]
    fn test_ratio_boundaries_do_not_fire() {
        let gate = TriggerGate::default();
        assert!(!gate.fires(1.2, 1.0));
        assert!(!gate.fires(0.8, 1.0));

        let gate = symmetric();
        assert!(!gate.fires(1.2, 1.0));
        assert!(!gate.fires(0.8, 1.0));
    }

    #[test]
    fn test_delta_boundary_does_not_fire() {
        let gate = TriggerGate::default();
        assert!(!gate.fires(0.5, 0.05));
        assert!(gate.fires(0.5, 0.0500001));

        let gate = symmetric();
        assert!(!gate.fires(1.5, 0.05));
        assert!(!gate.fires(0.5, 0.05));
    }

    #[test]
    fn test_evaluate_exact_upper_ratio() {
        let decision = TriggerGate::default().evaluate(1.2, 1.0);
        assert_eq!(decision.ratio, 1.2);
        assert!(!decision.fired);

        let decision = TriggerGate::default().evaluate(0.8, 1.0);
        assert_eq!(decision.ratio, 0.8);
        assert!(!decision.fired);
    }

    #[test]
    fn test_evaluate_exact_min_delta() {
        // 0.125 - 0.075 在 f64 下恰好等于 0.05
        let decision = TriggerGate::default().evaluate(0.075, 0.125);
        assert_eq!(decision.delta, 0.05);
        assert!(decision.ratio < RATIO_LOWER);
        assert!(!decision.fired);
    }

    /// 向上分支不受绝对差约束，向下分支受约束
    #[test]
    fn test_legacy_precedence_is_asymmetric() {
        let gate = TriggerGate::default();

        // 0.01 → 0.02：比值 2.0，绝对差 0.01
        let up = gate.evaluate(0.02, 0.01);
        assert!(up.ratio > RATIO_UPPER);
        assert!(up.delta < MIN_DELTA);
        assert!(up.fired);

        // 0.02 → 0.01：比值 0.5，绝对差 0.01
        let down = gate.evaluate(0.01, 0.02);
        assert!(down.ratio < RATIO_LOWER);
        assert!(down.delta < MIN_DELTA);
        assert!(!down.fired);
    }

    #[test]
    fn test_symmetric_mode_guards_both_branches() {
        let gate = symmetric();
        assert!(!gate.evaluate(0.02, 0.01).fired);
        assert!(!gate.evaluate(0.01, 0.02).fired);
        assert!(gate.evaluate(0.8, 0.1).fired);
        assert!(gate.evaluate(0.1, 0.8).fired);
    }

    #[test]
    fn test_inside_band_does_not_fire() {
        let gate = TriggerGate::default();
        let decision = gate.evaluate(1.05, 1.0);
        assert!(!decision.fired);
    }

    #[test]
    fn test_zero_baseline() {
        let gate = TriggerGate::default();
        // 正数 / 0 = +inf > 1.2
        assert!(gate.evaluate(0.5, 0.0).fired);
        // 0 / 0 = NaN，所有比较为 false
        assert!(!gate.evaluate(0.0, 0.0).fired);
    }
}
