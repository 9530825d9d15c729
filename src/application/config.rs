use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchConfig,
    /// 交互提示配置
    pub prompt: PromptConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 显示相关配置
    pub display: DisplayConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 交互模式下预先填入的根目录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_root: Option<String>,
    /// 匹配数少于此值时逐个列出文件
    pub max_listed: usize,
}

/// 交互提示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// 无效输入的最大尝试次数
    pub max_attempts: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// 日志文件所在目录
    pub directory: String,
}

/// 显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 是否显示文件大小
    pub show_sizes: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_root: None,
            max_listed: 100,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: ".".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { show_sizes: true }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)
            .context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径（程序所在目录下的 config.toml）
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe()
            .context("无法获取程序路径")?;

        let exe_dir = exe_path.parent()
            .context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.prompt.max_attempts == 0 || self.prompt.max_attempts > 10 {
            anyhow::bail!("prompt.max_attempts 必须在 1-10 之间");
        }

        if self.search.max_listed > 100_000 {
            anyhow::bail!("search.max_listed 不能超过 100000");
        }

        if self.logging.directory.trim().is_empty() {
            anyhow::bail!("logging.directory 不能为空");
        }

        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.logging.directory)
    }
}
