//! # Tilt CLI
//!
//! 读取串口加速度计的倾角，在倾角确实发生变化时调用 `xrandr --transform` 旋转屏幕。
//!
//! ```bash
//! # 生成默认配置
//! tilt-cli config init
//!
//! # 运行（命令行参数覆盖配置文件）
//! tilt-cli run --device /dev/ttyACM0 --output HDMI-2
//!
//! # 只打印 xrandr 命令，不执行
//! RUST_LOG=tilt_driver=debug tilt-cli run --dry-run
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{ConfigCommand, RunCommand};

/// 未设置 RUST_LOG 时的日志过滤
const DEFAULT_LOG_FILTER: &str = "tilt_cli=info,tilt_driver=info";

/// Tilt CLI - 倾角驱动的屏幕旋转
#[derive(Parser, Debug)]
#[command(name = "tilt-cli")]
#[command(about = "Rotate a display from a serial tilt sensor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 读取串口并旋转屏幕
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args } => args.execute(),

        Commands::Config(cmd) => cmd.execute(),
    }
}
