//! Exa搜索API

use async_trait::async_trait;
use serde_json::json;

use super::{SearchEngine, SearchError, SearchHit, SearchResults};

const EXA_SEARCH_URL: &str = "https://api.exa.ai/search";
const NUM_RESULTS_MAX: usize = 100;
const SNIPPET_MAX_CHARS: usize = 300;

/// Exa搜索，只有一种调用方式
#[derive(Clone)]
pub struct ExaSearch {
    http: reqwest::Client,
    api_key: String,
}

impl ExaSearch {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl SearchEngine for ExaSearch {
    fn name(&self) -> &str {
        "exa"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<SearchResults, SearchError> {
        let body = json!({
            "query": query,
            "numResults": max_results.min(NUM_RESULTS_MAX),
            "type": "auto",
            "contents": { "text": { "maxCharacters": SNIPPET_MAX_CHARS * 4 } },
        });

        let response = self
            .http
            .post(EXA_SEARCH_URL)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::status(status.as_u16(), &body));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        parse_exa_results(&value, max_results)
    }
}

/// 解析Exa返回的JSON
pub fn parse_exa_results(
    value: &serde_json::Value,
    max_results: usize,
) -> Result<SearchResults, SearchError> {
    let results = value
        .get("results")
        .and_then(|r| r.as_array())
        .ok_or_else(|| SearchError::Parse("response has no `results` array".to_string()))?;

    let hits = results
        .iter()
        .filter_map(|r| {
            let url = r.get("url").and_then(|u| u.as_str())?.to_string();
            let title = r
                .get("title")
                .and_then(|t| t.as_str())
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("(no title)")
                .trim()
                .to_string();
            let text = r
                .get("summary")
                .and_then(|s| s.as_str())
                .or_else(|| r.get("text").and_then(|t| t.as_str()))
                .unwrap_or("");
            Some(SearchHit {
                title,
                url,
                snippet: excerpt(text, SNIPPET_MAX_CHARS),
            })
        })
        .take(max_results)
        .collect();

    Ok(SearchResults(hits))
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exa_results() {
        let value = json!({
            "results": [
                { "title": "Lefty Supply", "url": "https://lefty.example", "text": "Tools for\nleft-handed people" },
                { "title": "", "url": "https://untitled.example", "summary": "A summary wins over text", "text": "ignored" },
                { "title": "No url" }
            ]
        });

        let results = parse_exa_results(&value, 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.hits()[0].snippet, "Tools for left-handed people");
        assert_eq!(results.hits()[1].title, "(no title)");
        assert_eq!(results.hits()[1].snippet, "A summary wins over text");
    }

    #[test]
    fn test_parse_exa_results_without_array() {
        let err = parse_exa_results(&json!({ "error": "bad key" }), 5).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        let text = "é".repeat(10);
        assert_eq!(excerpt(&text, 4), "éééé...");
        assert_eq!(excerpt("short", 10), "short");
    }

    #[tokio::test]
    async fn test_alternate_is_unsupported() {
        let exa = ExaSearch::new(reqwest::Client::new(), "key".to_string());
        let err = exa.search_alternate("anything", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::Unsupported(ref name) if name == "exa"));
    }
}
