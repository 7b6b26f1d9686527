//! 网络搜索能力

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{SearchConfig, SearchProvider};

pub mod duckduckgo;
pub mod exa;

pub use duckduckgo::DuckDuckGoSearch;
pub use exa::ExaSearch;

/// 搜索错误
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search transport error: {0}")]
    Transport(String),
    #[error("search service returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("failed to parse search response: {0}")]
    Parse(String),
    #[error("{0} does not support this search method")]
    Unsupported(String),
}

/// 错误响应体最多保留的字符数，它会出现在提示信息和分析prompt中
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

impl SearchError {
    /// 非成功状态码，响应体截断后保存
    pub(crate) fn status(code: u16, body: &str) -> Self {
        SearchError::Status {
            code,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Parse(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// 一次搜索返回的原始结果列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults(pub Vec<SearchHit>);

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.0
    }
}

impl fmt::Display for SearchResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "[]");
        }
        for (i, hit) in self.0.iter().enumerate() {
            writeln!(f, "[{}] {}", i + 1, hit.title)?;
            writeln!(f, "  URL: {}", hit.url)?;
            if !hit.snippet.is_empty() {
                writeln!(f, "  {}", hit.snippet)?;
            }
        }
        Ok(())
    }
}

/// 网络搜索能力，提供主调用方式和一个备选调用方式
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// 搜索服务名称
    fn name(&self) -> &str;

    /// 主调用方式
    async fn search(&self, query: &str, max_results: usize) -> Result<SearchResults, SearchError>;

    /// 备选调用方式，主调用失败后使用
    async fn search_alternate(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<SearchResults, SearchError> {
        Err(SearchError::Unsupported(self.name().to_string()))
    }
}

/// 根据配置创建搜索服务
pub fn build_search_engine(config: &SearchConfig) -> Result<Arc<dyn SearchEngine>> {
    let http = reqwest::Client::builder()
        .user_agent(duckduckgo::USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;

    let engine: Arc<dyn SearchEngine> = match config.provider {
        SearchProvider::DuckDuckGo => Arc::new(DuckDuckGoSearch::new(http)),
        SearchProvider::Exa => {
            let api_key = config.api_key.clone().unwrap_or_default();
            Arc::new(ExaSearch::new(http, api_key))
        }
    };
    Ok(engine)
}

/// 去掉HTML标签并还原常见实体
pub(crate) fn html_to_text(fragment: &str) -> String {
    use regex::Regex;
    use std::sync::LazyLock;

    static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
    static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

    let stripped = TAG.replace_all(fragment, "");
    let decoded = decode_entities(&stripped);
    SPACES.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_truncates_body() {
        let err = SearchError::status(429, "quota exceeded");
        assert_eq!(err.to_string(), "search service returned 429: quota exceeded");

        let long = "é".repeat(500);
        match SearchError::status(500, &long) {
            SearchError::Status { code, body } => {
                assert_eq!(code, 500);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_results_display() {
        assert_eq!(SearchResults::default().to_string(), "[]");
    }

    #[test]
    fn test_results_display_lists_hits() {
        let results = SearchResults(vec![
            SearchHit {
                title: "Left-handed tools market".to_string(),
                url: "https://example.com/lefty".to_string(),
                snippet: "Niche but loyal".to_string(),
            },
            SearchHit {
                title: "Scissors subscriptions".to_string(),
                url: "https://example.org/subs".to_string(),
                snippet: String::new(),
            },
        ]);

        let rendered = results.to_string();
        assert!(rendered.contains("[1] Left-handed tools market"));
        assert!(rendered.contains("  URL: https://example.com/lefty"));
        assert!(rendered.contains("  Niche but loyal"));
        assert!(rendered.contains("[2] Scissors subscriptions"));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(
            html_to_text("<b>Left</b>-handed &amp; proud\n  <i>scissors</i>"),
            "Left-handed & proud scissors"
        );
        assert_eq!(html_to_text("it&#x27;s &quot;fine&quot;"), "it's \"fine\"");
    }

    #[test]
    fn test_build_duckduckgo_by_default() {
        let engine = build_search_engine(&SearchConfig::default()).unwrap();
        assert_eq!(engine.name(), "duckduckgo");
    }

    #[test]
    fn test_build_exa() {
        let config = SearchConfig {
            provider: SearchProvider::Exa,
            api_key: Some("exa-key".to_string()),
            ..Default::default()
        };
        let engine = build_search_engine(&config).unwrap();
        assert_eq!(engine.name(), "exa");
    }
}
