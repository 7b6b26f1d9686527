use crate::config::{Config, LLMProvider, OutputFormat, SearchProvider};
use crate::i18n::TargetLanguage;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "blindspot.toml";

/// Blindspot - 在市场发现之前找出创业想法的漏洞
#[derive(Parser, Debug)]
#[command(name = "blindspot")]
#[command(
    about = "Find the flaw before the market does: grounds a business idea in live web search results and scores its viability with an LLM."
)]
#[command(version)]
pub struct Args {
    /// 待评估的创业想法，可以传入多个
    pub ideas: Vec<String>,

    /// 从文件读取想法，每行一个，空行和以#开头的行会被忽略
    #[arg(long)]
    pub ideas_file: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 模型名称
    #[arg(short, long)]
    pub model: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 搜索服务 (duckduckgo, exa)
    #[arg(long)]
    pub search_provider: Option<String>,

    /// 搜索服务API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 搜索结果数量
    #[arg(long)]
    pub max_results: Option<usize>,

    /// 搜索查询中的年份标记
    #[arg(long)]
    pub year: Option<i32>,

    /// 报告语言 (en, zh, ja, ko, de, fr, ru)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 输出格式 (text, html, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// 输出文件路径
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 批量评估时的最大并发数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// 评估前检查模型连接
    #[arg(long)]
    pub check: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);
                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(anyhow::Error::msg)?;
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = Some(llm_api_base_url.clone());
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖搜索配置
        if let Some(provider_str) = &self.search_provider {
            config.search.provider = provider_str
                .parse::<SearchProvider>()
                .map_err(anyhow::Error::msg)?;
        }
        if let Some(search_api_key) = &self.search_api_key {
            config.search.api_key = Some(search_api_key.clone());
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }
        if let Some(year) = self.year {
            config.search.year_marker = Some(year);
        }

        // 报告语言与输出
        if let Some(target_language_str) = &self.target_language {
            match target_language_str.parse::<TargetLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言 ({})",
                    target_language_str,
                    config.target_language.display_name()
                ),
            }
        }
        if let Some(format_str) = &self.format {
            config.output_format = format_str
                .parse::<OutputFormat>()
                .map_err(anyhow::Error::msg)?;
        }
        if let Some(output) = &self.output {
            config.output_path = Some(output.clone());
        }
        if let Some(max_parallels) = self.max_parallels {
            config.max_parallels = max_parallels;
        }
        if self.verbose {
            config.verbose = true;
        }

        config.resolve_credentials();

        Ok(config)
    }

    /// 汇总命令行与文件中的想法，保持输入顺序
    pub fn collect_ideas(&self) -> Result<Vec<String>> {
        let mut ideas = self.ideas.clone();
        if let Some(path) = &self.ideas_file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read ideas file: {:?}", path))?;
            ideas.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_string),
            );
        }
        Ok(ideas)
    }
}
