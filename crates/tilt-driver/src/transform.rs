//! 显示变换矩阵
//!
//! 由倾角构造 3×3 仿射矩阵：
//!
//! ```text
//! | cos θ  -sin θ  1000·θ |
//! | sin θ   cos θ  0      |
//! | 0       0      1      |
//! ```
//!
//! 右上角的 `1000·θ` 不是旋转项，而是按 2560x1440 分辨率调出来的平移，
//! 用来把旋转后的画面拉回屏幕中间。改成「正确」的旋转中心公式会改变实际显示效果。

use nalgebra::Matrix3;
use std::fmt;

/// 平移项增益（像素 / 弧度）
pub const SKEW_GAIN: f64 = 1000.0;

/// 仿射变换描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Transform {
    /// 由倾角（弧度）构造
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            matrix: Matrix3::new(
                cos,
                -sin,
                SKEW_GAIN * angle,
                sin,
                cos,
                0.0,
                0.0,
                0.0,
                1.0,
            ),
        }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// `xrandr --transform` 参数
    pub fn to_arg(&self) -> String {
        self.to_string()
    }
}

/// 格式：`a,b,c,d,e,f,0,0,1`，a/b/d/e 保留 4 位小数，c 原样输出，f 与末行固定为整数
impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.matrix;
        write!(
            f,
            "{:.4},{:.4},{},{:.4},{:.4},0,0,0,1",
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
        )
    }
}
