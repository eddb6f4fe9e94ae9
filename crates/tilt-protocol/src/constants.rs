//! 帧布局常量
//!
//! 一帧的线上布局（共 15 字节）：
//!
//! ```text
//! offset: 0..4   4   5..9   9   10..14  14
//!         XXXX   ,   YYYY   ,   ZZZZ    \n
//! ```

/// 单个分量的字节宽度（`i32`，大端）
pub const FIELD_WIDTH: usize = 4;

/// 每帧的分量个数（x, y, z）
pub const FIELD_COUNT: usize = 3;

/// 分量分隔符
pub const FIELD_DELIMITER: u8 = b',';

/// 帧结束符
pub const FRAME_TERMINATOR: u8 = b'\n';

/// 分量 + 其后分隔符（或结束符）所占的字节数
pub const FIELD_STRIDE: usize = FIELD_WIDTH + 1;

/// 去掉结束符后的帧长度
pub const FRAME_BODY_LEN: usize = FIELD_COUNT * FIELD_STRIDE - 1;

/// 含结束符的完整帧长度
pub const FRAME_LEN: usize = FRAME_BODY_LEN + 1;

/// 行缓冲上限，超过后强制切出一行（必然解析失败），用于重新同步
pub const MAX_LINE_LEN: usize = 64;
