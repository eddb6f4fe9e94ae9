//! 显示变换下发
//!
//! 通过外部命令 `xrandr --output <SCREEN> --transform <matrix>` 应用变换。
//! 调用是阻塞的；失败即返回错误，由主循环终止进程，不做重试。

use crate::error::EmitError;
use crate::transform::Transform;
use std::process::Command;
use tracing::info;

/// 默认外部程序
pub const DEFAULT_PROGRAM: &str = "xrandr";

/// 变换下发接口
pub trait TransformEmitter {
    fn emit(&mut self, transform: &Transform) -> Result<(), EmitError>;
}

impl<T: TransformEmitter + ?Sized> TransformEmitter for Box<T> {
    fn emit(&mut self, transform: &Transform) -> Result<(), EmitError> {
        (**self).emit(transform)
    }
}

/// 调用 xrandr 的下发器
///
/// # 示例
///
/// ```rust
/// use tilt_driver::{Transform, XrandrEmitter};
///
/// let emitter = XrandrEmitter::new("HDMI-2");
/// let argv = emitter.argv(&Transform::from_angle(0.0));
/// assert_eq!(&argv[..4], &["xrandr", "--output", "HDMI-2", "--transform"]);
/// ```
#[derive(Debug, Clone)]
pub struct XrandrEmitter {
    program: String,
    output: String,
    /// 只打印命令行，不执行
    dry_run: bool,
}

impl XrandrEmitter {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            output: output.into(),
            dry_run: false,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// 完整命令行（含程序名）
    pub fn argv(&self, transform: &Transform) -> Vec<String> {
        vec![
            self.program.clone(),
            "--output".to_string(),
            self.output.clone(),
            "--transform".to_string(),
            transform.to_arg(),
        ]
    }
}

impl TransformEmitter for XrandrEmitter {
    fn emit(&mut self, transform: &Transform) -> Result<(), EmitError> {
        let argv = self.argv(transform);
        let command = argv.join(" ");

        if self.dry_run {
            info!("(dry-run) {}", command);
            return Ok(());
        }

        info!("{}", command);
        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .status()
            .map_err(|source| EmitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EmitError::CommandFailed { command, status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_layout() {
        let emitter = XrandrEmitter::new("eDP-1").with_program("/usr/bin/xrandr");
        let argv = emitter.argv(&Transform::from_angle(0.0));

        assert_eq!(argv.len(), 5);
        assert_eq!(argv[0], "/usr/bin/xrandr");
        assert_eq!(argv[1], "--output");
        assert_eq!(argv[2], "eDP-1");
        assert_eq!(argv[3], "--transform");
        assert!(argv[4].ends_with(",0,0,0,1"));
    }

    #[test]
    fn test_dry_run_never_spawns() {
        let mut emitter = XrandrEmitter::new("HDMI-2")
            .with_program("/nonexistent/tilt-xrandr")
            .dry_run(true);
        assert!(emitter.emit(&Transform::from_angle(0.3)).is_ok());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut emitter = XrandrEmitter::new("HDMI-2").with_program("/nonexistent/tilt-xrandr");
        let err = emitter.emit(&Transform::from_angle(0.3)).unwrap_err();
        assert!(matches!(err, EmitError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_checked() {
        let mut ok = XrandrEmitter::new("HDMI-2").with_program("true");
        assert!(ok.emit(&Transform::from_angle(0.3)).is_ok());

        let mut failing = XrandrEmitter::new("HDMI-2").with_program("false");
        let err = failing.emit(&Transform::from_angle(0.3)).unwrap_err();
        match err {
            EmitError::CommandFailed { command, status } => {
                assert!(command.starts_with("false --output HDMI-2 --transform "));
                assert!(!status.success());
            },
            other => panic!("Expected CommandFailed, got {:?}", other),
        }
    }
}
