//! 倾角平滑窗口
//!
//! 保存最近至多 3 个倾角，均值作为门限比较的基线，抑制单帧噪声。

use std::collections::VecDeque;

/// 历史容量
pub const HISTORY_CAPACITY: usize = 3;

/// 默认种子倾角（弧度），保证第一帧到来前基线已有定义且非零
pub const DEFAULT_HISTORY_SEED: f64 = 0.1;

/// 固定容量的 FIFO 倾角历史
///
/// 不变量：构造后长度始终在 `1..=HISTORY_CAPACITY` 之间。
///
/// # 示例
///
/// ```rust
/// use tilt_driver::SmoothingWindow;
///
/// let mut window = SmoothingWindow::new(0.1);
/// assert_eq!(window.baseline(), 0.1);
///
/// window.push(1.0);
/// window.push(2.0);
/// window.push(3.0); // 0.1 被淘汰
/// assert_eq!(window.baseline(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingWindow {
    history: VecDeque<f64>,
}

impl SmoothingWindow {
    /// 以单个种子值初始化
    pub fn new(seed: f64) -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_CAPACITY + 1);
        history.push_back(seed);
        Self { history }
    }

    /// 追加倾角，超出容量时淘汰最旧的一个
    pub fn push(&mut self, angle: f64) {
        self.history.push_back(angle);
        if self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    /// 历史均值
    pub fn baseline(&self) -> f64 {
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.history.len() == HISTORY_CAPACITY
    }

    /// 从旧到新遍历
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_defines_baseline() {
        let window = SmoothingWindow::default();
        assert_eq!(window.len(), 1);
        assert!(!window.is_empty());
        assert_eq!(window.baseline(), DEFAULT_HISTORY_SEED);
    }

    #[test]
    fn test_mean_of_partial_history() {
        let mut window = SmoothingWindow::new(1.0);
        window.push(3.0);
        assert_eq!(window.len(), 2);
        assert_eq!(window.baseline(), 2.0);
        assert!(!window.is_full());
    }

    #[test]
    fn test_fourth_push_evicts_oldest() {
        let mut window = SmoothingWindow::new(100.0);
        window.push(1.0);
        window.push(2.0);
        assert!(window.is_full());

        window.push(6.0);
        assert_eq!(window.len(), HISTORY_CAPACITY);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 6.0]);
        assert_eq!(window.baseline(), 3.0);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut window = SmoothingWindow::default();
        for i in 0..50 {
            window.push(i as f64);
            assert!(window.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![47.0, 48.0, 49.0]);
    }
}
