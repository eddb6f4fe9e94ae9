//! 帧解析与编码

use crate::constants::*;
use crate::{ProtocolError, RawSample, bytes_to_i32_be, i32_to_bytes_be};

/// 解析一行数据为 [`RawSample`]
///
/// `line` 必须以 `\n` 结尾。去掉结束符后按 `,` 切成三个字段，
/// 每个字段按大端 `i32` 解码。
///
/// 字段本身是原始字节，可能恰好等于 `,` 或 `\n`，因此分隔符只在固定偏移
/// （4 和 9）处检查，而不是对整行做朴素的 `split`。
///
/// # 错误
/// - `MissingTerminator`: 行尾不是 `\n`
/// - `InvalidLength`: 字段数量或字段宽度不对（例如 ASCII 文本 `"abc,100,5"`）
/// - `InvalidDelimiter`: 固定偏移处不是 `,`
pub fn parse_frame(line: &[u8]) -> Result<RawSample, ProtocolError> {
    let body = match line.split_last() {
        Some((&FRAME_TERMINATOR, body)) => body,
        _ => return Err(ProtocolError::MissingTerminator),
    };

    if body.len() != FRAME_BODY_LEN {
        return Err(ProtocolError::InvalidLength {
            expected: FRAME_BODY_LEN,
            actual: body.len(),
        });
    }

    let mut fields = [0i32; FIELD_COUNT];
    for (index, chunk) in body.chunks(FIELD_STRIDE).enumerate() {
        let (field, delimiter) = chunk.split_at(FIELD_WIDTH);
        if let Some(&found) = delimiter.first() {
            if found != FIELD_DELIMITER {
                return Err(ProtocolError::InvalidDelimiter {
                    offset: index * FIELD_STRIDE + FIELD_WIDTH,
                    found,
                });
            }
        }

        let bytes: [u8; FIELD_WIDTH] =
            field.try_into().map_err(|_| ProtocolError::InvalidLength {
                expected: FIELD_WIDTH,
                actual: field.len(),
            })?;
        fields[index] = bytes_to_i32_be(bytes);
    }

    Ok(RawSample::new(fields[0], fields[1], fields[2]))
}

/// 按设备端格式编码一帧（含结束符）
pub fn encode_frame(sample: &RawSample) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    for (index, value) in [sample.x, sample.y, sample.z].into_iter().enumerate() {
        let start = index * FIELD_STRIDE;
        frame[start..start + FIELD_WIDTH].copy_from_slice(&i32_to_bytes_be(value));
        frame[start + FIELD_WIDTH] = if index + 1 == FIELD_COUNT {
            FRAME_TERMINATOR
        } else {
            FIELD_DELIMITER
        };
    }
    frame
}
