//! 配置管理命令
//!
//! 用于查看和初始化 CLI 配置文件

use anyhow::{Result, bail};
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::{CliConfig, default_config_path};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示合并后的配置（TOML）
    Show {
        /// 配置文件路径
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 显示默认配置文件路径
    Path,

    /// 写入默认配置文件
    Init {
        /// 目标路径（默认 ~/.config/tilt/config.toml）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { config } => Self::show_(config),

            ConfigCommand::Path => Self::path_(),

            ConfigCommand::Init { path, force } => Self::init_(path, force),
        }
    }

    fn show_(config: Option<PathBuf>) -> Result<()> {
        let config = CliConfig::load(config.as_deref())?;
        config.validate()?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn path_() -> Result<()> {
        println!("{}", default_config_path()?.display());
        Ok(())
    }

    fn init_(path: Option<PathBuf>, force: bool) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => default_config_path()?,
        };

        if path.exists() && !force {
            bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        CliConfig::default().save(&path)?;
        println!("✅ 已写入配置文件: {}", path.display());
        Ok(())
    }
}
