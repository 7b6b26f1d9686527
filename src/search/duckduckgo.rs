//! DuckDuckGo网页搜索，无需API KEY
//!
//! 主调用方式请求HTML版结果页，备选调用方式请求Lite版结果页，两者的页面结构不同。

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use super::{SearchEngine, SearchError, SearchHit, SearchResults, html_to_text};

pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const LITE_ENDPOINT: &str = "https://lite.duckduckgo.com/lite/";

static HTML_TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s([^>]*class="[^"]*result__a[^"]*"[^>]*)>(.*?)</a>"#).unwrap()
});
static HTML_SNIPPET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(?:a|div|td)\s[^>]*class="[^"]*result__snippet[^"]*"[^>]*>(.*?)</(?:a|div|td)>"#)
        .unwrap()
});
static LITE_TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s([^>]*class=['"]result-link['"][^>]*)>(.*?)</a>"#).unwrap()
});
static LITE_SNIPPET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<td\s[^>]*class=['"]result-snippet['"][^>]*>(.*?)</td>"#).unwrap()
});
static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=['"]([^'"]+)['"]"#).unwrap());

/// DuckDuckGo搜索
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    http: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn read_body(response: reqwest::Response) -> Result<String, SearchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::status(status.as_u16(), &body));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<SearchResults, SearchError> {
        let response = self
            .http
            .post(HTML_ENDPOINT)
            .form(&[("q", query), ("kl", "wt-wt")])
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(parse_html_results(&body, max_results))
    }

    async fn search_alternate(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchResults, SearchError> {
        let response = self
            .http
            .get(LITE_ENDPOINT)
            .query(&[("q", query)])
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(parse_lite_results(&body, max_results))
    }
}

/// 解析HTML版结果页
pub fn parse_html_results(body: &str, max_results: usize) -> SearchResults {
    collect_hits(&HTML_TITLE_TAG, &HTML_SNIPPET, body, max_results)
}

/// 解析Lite版结果页
pub fn parse_lite_results(body: &str, max_results: usize) -> SearchResults {
    collect_hits(&LITE_TITLE_TAG, &LITE_SNIPPET, body, max_results)
}

/// 每条结果的摘要只在本条标题之后、下一条标题之前查找
fn collect_hits(
    title_tag: &Regex,
    snippet_tag: &Regex,
    body: &str,
    max_results: usize,
) -> SearchResults {
    let titles: Vec<_> = title_tag.captures_iter(body).collect();

    let hits = titles
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let whole = c.get(0)?;
            let block_end = titles
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(body.len(), |next| next.start());
            let snippet = snippet_tag
                .captures(&body[whole.end()..block_end])
                .map(|s| html_to_text(&s[1]))
                .unwrap_or_default();

            let href = HREF.captures(&c[1])?.get(1)?.as_str();
            let url = resolve_redirect(href)?;
            Some(SearchHit {
                title: html_to_text(&c[2]),
                url,
                snippet,
            })
        })
        // 广告结果走y.js跳转，直接丢弃
        .filter(|hit| !hit.url.contains("duckduckgo.com/y.js"))
        .take(max_results)
        .collect();
    SearchResults(hits)
}

/// DuckDuckGo把目标地址包在 `//duckduckgo.com/l/?uddg=...` 中
fn resolve_redirect(href: &str) -> Option<String> {
    let href = href.replace("&amp;", "&");
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href
    };

    let url = reqwest::Url::parse(&absolute).ok()?;
    if url.path().starts_with("/l/")
        && let Some((_, target)) = url.query_pairs().find(|(key, _)| key == "uddg")
    {
        return Some(target.into_owned());
    }
    Some(url.to_string())
}
