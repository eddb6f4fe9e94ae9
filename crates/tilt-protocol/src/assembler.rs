//! 行切分器
//!
//! 把串口读到的任意分块字节流切成候选行，交给 [`parse_frame`](crate::parse_frame)。
//!
//! 由于分量是原始字节，`0x0A` 可能出现在分量内部。切分器只在「分隔符槽位」
//! （行内偏移 % 5 == 4）或超过帧长度之后才把 `\n` 当作行结束，
//! 其余位置的 `\n` 视为数据。
//!
//! 一旦偏移 4 或 9 处不是 `,`，当前行已确定是坏帧，此后任意位置的 `\n`
//! 都结束该行，坏行不会吞掉紧随其后的合法帧。

use crate::constants::*;

/// 行切分器
///
/// # 示例
///
/// ```rust
/// use tilt_protocol::{LineAssembler, RawSample, encode_frame, parse_frame};
///
/// let frame = encode_frame(&RawSample::new(500, 10, 5));
/// let mut assembler = LineAssembler::new();
///
/// assert!(assembler.extend(&frame[..7]).is_empty());
/// let lines = assembler.extend(&frame[7..]);
/// assert_eq!(lines.len(), 1);
/// assert_eq!(parse_frame(&lines[0]).unwrap(), RawSample::new(500, 10, 5));
/// ```
#[derive(Debug)]
pub struct LineAssembler {
    buffer: Vec<u8>,
    /// 当前行的分隔符槽位已出现非 `,` 字节
    corrupt: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(FRAME_LEN),
            corrupt: false,
        }
    }

    /// 输入一个字节，凑满一行时返回该行（含结束符）
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        self.buffer.push(byte);
        let offset = self.buffer.len() - 1;
        let at_slot = offset % FIELD_STRIDE == FIELD_WIDTH || offset >= FRAME_BODY_LEN;

        if byte == FRAME_TERMINATOR && (at_slot || self.corrupt)
            || self.buffer.len() >= MAX_LINE_LEN
        {
            return Some(self.take_line());
        }

        if offset < FRAME_BODY_LEN && offset % FIELD_STRIDE == FIELD_WIDTH && byte != FIELD_DELIMITER
        {
            self.corrupt = true;
        }
        None
    }

    /// 输入一段字节，返回其中凑满的所有行
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// 尚未凑成一行的字节数
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// 丢弃未完成的行
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.corrupt = false;
    }

    fn take_line(&mut self) -> Vec<u8> {
        self.corrupt = false;
        std::mem::replace(&mut self.buffer, Vec::with_capacity(FRAME_LEN))
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawSample, encode_frame, parse_frame};

    #[test]
    fn test_single_frame_byte_by_byte() {
        let frame = encode_frame(&RawSample::new(100, 100, 5));
        let mut assembler = LineAssembler::new();

        for &byte in &frame[..FRAME_LEN - 1] {
            assert!(assembler.push(byte).is_none());
        }
        let line = assembler.push(frame[FRAME_LEN - 1]).unwrap();
        assert_eq!(line, frame.to_vec());
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_newline_byte_inside_field_is_data() {
        // y = 10 的最低字节是 0x0A
        let frame = encode_frame(&RawSample::new(500, 10, 5));
        let mut assembler = LineAssembler::new();

        let lines = assembler.extend(&frame);
        assert_eq!(lines.len(), 1);
        assert_eq!(parse_frame(&lines[0]).unwrap(), RawSample::new(500, 10, 5));
    }

    #[test]
    fn test_ascii_line_ends_at_slot() {
        let mut assembler = LineAssembler::new();
        let lines = assembler.extend(b"abc,100,5\n");
        assert_eq!(lines, vec![b"abc,100,5\n".to_vec()]);
    }

    #[test]
    fn test_short_ascii_line_does_not_swallow_next_frame() {
        let sample = RawSample::new(100, 100, 5);
        let mut assembler = LineAssembler::new();

        let mut lines = assembler.extend(b"1,2,3\n");
        lines.extend(assembler.extend(&encode_frame(&sample)));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], b"1,2,3\n".to_vec());
        assert!(parse_frame(&lines[0]).is_err());
        assert_eq!(parse_frame(&lines[1]).unwrap(), sample);
    }

    #[test]
    fn test_corrupt_line_then_frame_with_newline_payload() {
        // y = 10 的最低字节是 0x0A，坏行结束后仍按槽位规则拼帧
        let sample = RawSample::new(500, 10, 5);
        let mut assembler = LineAssembler::new();

        let mut lines = assembler.extend(b"xxxxx\n");
        lines.extend(assembler.extend(&encode_frame(&sample)));

        assert_eq!(lines.len(), 2);
        assert_eq!(parse_frame(&lines[1]).unwrap(), sample);
    }

    #[test]
    fn test_resync_after_partial_frame() {
        let sample = RawSample::new(100, 100, 5);
        let frame = encode_frame(&sample);
        let mut assembler = LineAssembler::new();

        // 上电时的残帧，'\n' 不在槽位上，继续累积
        assert!(assembler.extend(b"12\n").is_empty());

        let mut lines = assembler.extend(&frame);
        lines.extend(assembler.extend(&frame));

        assert_eq!(lines.len(), 2);
        assert!(parse_frame(&lines[0]).is_err());
        assert_eq!(parse_frame(&lines[1]).unwrap(), sample);
    }

    #[test]
    fn test_overflow_flushes_line() {
        let mut assembler = LineAssembler::new();
        let noise = [0xAAu8; 100];

        let lines = assembler.extend(&noise);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
        assert_eq!(assembler.pending(), 100 - MAX_LINE_LEN);

        assembler.clear();
        assert_eq!(assembler.pending(), 0);
    }
}
