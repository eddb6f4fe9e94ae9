//! run 命令
//!
//! 打开串口，持续读取倾角并在需要时旋转屏幕，直到 Ctrl+C 或发生致命错误。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tilt_driver::{MetricsSnapshot, Pipeline};
use tilt_serial::SerialPortAdapter;
use tracing::info;

use crate::config::{CliConfig, GateModeSetting};

/// run 命令参数
#[derive(Args, Debug, Default)]
pub struct RunCommand {
    /// 配置文件路径（默认 ~/.config/tilt/config.toml）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 串口设备（覆盖配置）
    #[arg(short, long)]
    pub device: Option<String>,

    /// 波特率（覆盖配置）
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// xrandr 输出名（覆盖配置）
    #[arg(short, long)]
    pub output: Option<String>,

    /// 外部程序（覆盖配置）
    #[arg(long)]
    pub program: Option<String>,

    /// 串口读超时，毫秒（覆盖配置）
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// 门限组合方式（覆盖配置）
    #[arg(long, value_enum)]
    pub gate_mode: Option<GateModeSetting>,

    /// 只打印命令，不执行
    #[arg(long)]
    pub dry_run: bool,
}

impl RunCommand {
    /// 合并配置文件与命令行参数并校验
    pub fn resolve(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut CliConfig) {
        if let Some(ref device) = self.device {
            config.serial.device = device.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.serial.read_timeout_ms = timeout_ms;
        }
        if let Some(ref output) = self.output {
            config.display.output = output.clone();
        }
        if let Some(ref program) = self.program {
            config.display.program = program.clone();
        }
        if let Some(gate_mode) = self.gate_mode {
            config.filter.gate_mode = gate_mode;
        }
    }

    pub fn execute(&self) -> Result<()> {
        let config = self.resolve()?;

        // Ctrl+C 只清除标志位，主循环在下一次读超时内退出
        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || {
            r.store(false, Ordering::SeqCst);
            eprintln!("\n收到退出信号，正在关闭...");
        })?;

        let serial = &config.serial;
        let adapter = SerialPortAdapter::new(
            serial.device.as_str(),
            serial.baud_rate,
            Duration::from_millis(serial.read_timeout_ms),
        )
        .with_context(|| format!("打开串口 {} 失败", serial.device))?;

        info!(
            "Listening on {} @ {} baud, output {}{}",
            serial.device,
            serial.baud_rate,
            config.display.output,
            if self.dry_run { " (dry-run)" } else { "" }
        );

        let mut pipeline = Pipeline::new(
            adapter,
            config.emitter(self.dry_run),
            config.pipeline_config(),
        );
        let metrics = pipeline.metrics();

        let result = pipeline.run(&running);
        log_summary(&metrics.snapshot());
        result.context("主循环异常退出")
    }
}

fn log_summary(snapshot: &MetricsSnapshot) {
    info!(
        "frames: {} (malformed {}, {:.1}%), timeouts: {}, gate fired: {}, emitted: {}, suppressed: {}, skipped: {}",
        snapshot.frames_total,
        snapshot.frames_malformed,
        snapshot.malformed_rate(),
        snapshot.rx_timeouts,
        snapshot.gate_fired,
        snapshot.emitted,
        snapshot.suppressed,
        snapshot.skipped_noisy,
    );
}
