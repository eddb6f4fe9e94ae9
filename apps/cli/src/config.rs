//! CLI 配置
//!
//! 优先级（后者覆盖前者）：内置默认值 → 配置文件 → 命令行参数。
//!
//! 配置文件示例（`~/.config/tilt/config.toml`）：
//!
//! ```toml
//! [serial]
//! device = "/dev/ttyACM0"
//! baud_rate = 115200
//! read_timeout_ms = 1000
//!
//! [display]
//! output = "HDMI-2"
//! program = "xrandr"
//!
//! [filter]
//! history_seed = 0.1
//! ratio_upper = 1.2
//! ratio_lower = 0.8
//! min_delta = 0.05
//! gate_mode = "legacy"
//! ```

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tilt_driver::{GateConfig, GateMode, PipelineConfig, XrandrEmitter};

/// 默认串口设备
pub const DEFAULT_DEVICE: &str = "/dev/ttyACM0";

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// 默认显示输出
pub const DEFAULT_OUTPUT: &str = "HDMI-2";

/// 默认配置文件路径：`<config_dir>/tilt/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("tilt");
    path.push("config.toml");
    Ok(path)
}

/// 门限组合方式（配置文件 / 命令行写法）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GateModeSetting {
    /// 绝对差只约束向下的分支（默认）
    #[default]
    Legacy,
    /// 绝对差同时约束两个分支
    Symmetric,
}

impl From<GateModeSetting> for GateMode {
    fn from(setting: GateModeSetting) -> Self {
        match setting {
            GateModeSetting::Legacy => GateMode::Legacy,
            GateModeSetting::Symmetric => GateMode::Symmetric,
        }
    }
}

/// 串口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialSection {
    pub device: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: PipelineConfig::default().receive_timeout_ms,
        }
    }
}

/// 显示配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    /// xrandr 输出名
    pub output: String,
    /// 外部程序
    pub program: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            program: tilt_driver::emitter::DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// 去抖配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    pub history_seed: f64,
    pub ratio_upper: f64,
    pub ratio_lower: f64,
    pub min_delta: f64,
    pub gate_mode: GateModeSetting,
}

impl Default for FilterSection {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            history_seed: pipeline.history_seed,
            ratio_upper: pipeline.gate.ratio_upper,
            ratio_lower: pipeline.gate.ratio_lower,
            min_delta: pipeline.gate.min_delta,
            gate_mode: GateModeSetting::default(),
        }
    }
}

/// CLI 配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub serial: SerialSection,
    pub display: DisplaySection,
    pub filter: FilterSection,
}

impl CliConfig {
    /// 加载配置
    ///
    /// 指定了 `path` 时文件必须存在；否则尝试默认路径，不存在时使用内置默认值。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_file(path);
        }

        let path = default_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存配置（自动创建父目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }
        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
        Ok(())
    }

    /// 启动前一次性校验
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.serial.device.trim().is_empty(), "串口设备不能为空");
        ensure!(self.serial.baud_rate > 0, "波特率必须大于 0");
        ensure!(self.serial.read_timeout_ms > 0, "读超时必须大于 0");
        ensure!(!self.display.output.trim().is_empty(), "显示输出不能为空");
        ensure!(!self.display.program.trim().is_empty(), "外部程序不能为空");

        let filter = &self.filter;
        ensure!(
            filter.history_seed.is_finite() && filter.history_seed != 0.0,
            "history_seed 必须是非零有限值，得到 {}",
            filter.history_seed
        );
        ensure!(
            filter.ratio_lower.is_finite()
                && filter.ratio_upper.is_finite()
                && filter.ratio_lower < filter.ratio_upper,
            "需要 ratio_lower < ratio_upper，得到 {} / {}",
            filter.ratio_lower,
            filter.ratio_upper
        );
        ensure!(
            filter.min_delta.is_finite() && filter.min_delta >= 0.0,
            "min_delta 必须是非负有限值，得到 {}",
            filter.min_delta
        );
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            history_seed: self.filter.history_seed,
            receive_timeout_ms: self.serial.read_timeout_ms,
            gate: GateConfig {
                ratio_upper: self.filter.ratio_upper,
                ratio_lower: self.filter.ratio_lower,
                min_delta: self.filter.min_delta,
                mode: self.filter.gate_mode.into(),
            },
        }
    }

    pub fn emitter(&self, dry_run: bool) -> XrandrEmitter {
        XrandrEmitter::new(&self.display.output)
            .with_program(&self.display.program)
            .dry_run(dry_run)
    }
}
