//! 交替限流器
//!
//! 传感器输出频率不高于 1 Hz，而主循环的轮询粒度更细，一次真实的物理转动
//! 通常会让门限连续触发两次。这里每两次触发只放行一次，近似「每个物理事件发一条命令」。
//!
//! 主循环内不能用 sleep 节流：串口会独立缓冲字节，sleep 只会造成积压和延迟。

/// 限流结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Emit,
    Suppress,
}

/// 单标志位交替限流器，初始为「待发」
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    armed: bool,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self { armed: true }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// 门限触发时调用一次；无论结果如何标志位都翻转
    pub fn admit(&mut self) -> RateDecision {
        let decision = if self.armed {
            RateDecision::Emit
        } else {
            RateDecision::Suppress
        };
        self.armed = !self.armed;
        decision
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
