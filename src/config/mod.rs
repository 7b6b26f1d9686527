use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::i18n::TargetLanguage;

/// 读取LLM API KEY时优先使用的环境变量
pub const LLM_API_KEY_ENV: &str = "BLINDSPOT_LLM_API_KEY";
/// 兼容Gemini官方SDK习惯的环境变量
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Exa搜索的API KEY环境变量
pub const EXA_API_KEY_ENV: &str = "EXA_API_KEY";

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential for {provider}: set {env_var} or pass it on the command line")]
    MissingCredential {
        provider: String,
        env_var: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    #[default]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl LLMProvider {
    /// 是否需要API KEY（本地Ollama不需要）
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }

    /// 该provider专属的API KEY环境变量，只有Gemini有
    pub fn provider_key_env(&self) -> Option<&'static str> {
        match self {
            LLMProvider::Gemini => Some(GOOGLE_API_KEY_ENV),
            _ => None,
        }
    }

    /// 缺少凭据时提示用户设置的环境变量
    pub fn credential_env_hint(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => "BLINDSPOT_LLM_API_KEY or GOOGLE_API_KEY",
            _ => LLM_API_KEY_ENV,
        }
    }
}

/// 搜索服务类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum SearchProvider {
    #[serde(rename = "duckduckgo")]
    #[default]
    DuckDuckGo,
    #[serde(rename = "exa")]
    Exa,
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProvider::DuckDuckGo => write!(f, "duckduckgo"),
            SearchProvider::Exa => write!(f, "exa"),
        }
    }
}

impl std::str::FromStr for SearchProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(SearchProvider::DuckDuckGo),
            "exa" => Ok(SearchProvider::Exa),
            _ => Err(format!("Unknown search provider: {}", s)),
        }
    }
}

/// 报告输出格式
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum OutputFormat {
    #[serde(rename = "text")]
    #[default]
    Text,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "json")]
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索配置
    pub search: SearchConfig,

    /// 报告语言
    pub target_language: TargetLanguage,

    /// 输出格式
    pub output_format: OutputFormat,

    /// 输出路径，为空时输出到标准输出
    pub output_path: Option<PathBuf>,

    /// 批量评估时的最大并发数
    pub max_parallels: usize,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址，仅OpenAI兼容类的provider使用
    pub api_base_url: Option<String>,

    /// 调研与分析共用的模型
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 搜索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 搜索服务
    pub provider: SearchProvider,

    /// 请求的结果数量
    pub max_results: usize,

    /// 搜索服务API KEY（DuckDuckGo不需要）
    pub api_key: Option<String>,

    /// 查询中使用的年份标记，为空时使用当前年份
    pub year_marker: Option<i32>,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 启动前校验配置，缺少凭据时直接拒绝启动
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.provider.requires_api_key() && self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                provider: self.llm.provider.to_string(),
                env_var: self.llm.provider.credential_env_hint(),
            });
        }

        if self.search.provider == SearchProvider::Exa
            && self
                .search
                .api_key
                .as_deref()
                .is_none_or(|key| key.trim().is_empty())
        {
            return Err(ConfigError::MissingCredential {
                provider: self.search.provider.to_string(),
                env_var: EXA_API_KEY_ENV,
            });
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if self.max_parallels == 0 {
            return Err(ConfigError::Invalid(
                "max_parallels must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// provider确定之后补全API KEY：仅在未配置时读取该provider专属的环境变量
    pub fn resolve_credentials(&mut self) {
        self.resolve_credentials_with(|name| std::env::var(name).ok());
    }

    pub(crate) fn resolve_credentials_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if !self.llm.api_key.trim().is_empty() {
            return;
        }
        if let Some(key) = self
            .llm
            .provider
            .provider_key_env()
            .and_then(lookup)
        {
            self.llm.api_key = key;
        }
    }

    /// 搜索查询使用的年份标记
    pub fn year_marker(&self) -> i32 {
        use chrono::Datelike;

        self.search
            .year_marker
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            target_language: TargetLanguage::default(),
            output_format: OutputFormat::default(),
            output_path: None,
            max_parallels: 3,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var(LLM_API_KEY_ENV).unwrap_or_default(),
            api_base_url: None,
            model: String::from("gemini-2.5-flash"),
            max_tokens: 8192,
            temperature: 0.4,
            timeout_seconds: 300,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::default(),
            max_results: 5,
            api_key: std::env::var(EXA_API_KEY_ENV).ok(),
            year_marker: None,
            timeout_seconds: 30,
        }
    }
}
