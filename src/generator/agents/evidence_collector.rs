use anyhow::Result;

use crate::generator::context::GeneratorContext;
use crate::generator::prompts::{NO_LINKS_PLACEHOLDER, build_search_query, research_prompt};
use crate::generator::types::{Idea, MarketEvidence};
use crate::search::{SearchError, SearchResults};
use crate::utils::markup::strip_markup_fences;

/// 证据收集员 - 搜索市场信息并整理为来源列表
///
/// 这一环节从不向上抛出错误：任何失败都会转成一条可展示的提示，流程继续进入分析环节。
#[derive(Default)]
pub struct EvidenceCollector;

impl EvidenceCollector {
    pub async fn collect(&self, context: &GeneratorContext, idea: &Idea) -> MarketEvidence {
        match self.try_collect(context, idea).await {
            Ok(evidence) => evidence,
            Err(err) => {
                eprintln!("⚠️ 市场证据收集失败，使用提示信息代替: {:#}", err);
                MarketEvidence::new(search_error_notice(&err))
            }
        }
    }

    async fn try_collect(&self, context: &GeneratorContext, idea: &Idea) -> Result<MarketEvidence> {
        let query = build_search_query(idea, context.config.year_marker());
        let raw_results = self.fetch_results(context, &query).await?;

        if context.config.verbose {
            eprintln!(
                "   🔎 {} 返回 {} 条结果",
                context.search.name(),
                raw_results.len()
            );
        }

        // 没有任何结果时不必让模型整理
        if raw_results.is_empty() {
            return Ok(MarketEvidence::new(NO_LINKS_PLACEHOLDER));
        }

        let prompt = research_prompt(idea, &raw_results);
        let response = context.model.generate(&prompt).await?;
        Ok(MarketEvidence::new(strip_markup_fences(&response)))
    }

    /// 主调用方式失败后尝试一次备选调用方式
    async fn fetch_results(
        &self,
        context: &GeneratorContext,
        query: &str,
    ) -> Result<SearchResults, SearchError> {
        let max_results = context.config.search.max_results;
        match context.search.search(query, max_results).await {
            Ok(results) => Ok(results),
            Err(primary_err) => {
                if context.config.verbose {
                    eprintln!("   ↪️ 搜索主调用失败，尝试备选方式: {}", primary_err);
                }
                context.search.search_alternate(query, max_results).await
            }
        }
    }
}

/// 证据收集失败时展示给用户的提示，原样包含错误信息
pub fn search_error_notice(err: &anyhow::Error) -> String {
    format!("<p>⚠️ Search connection error: {}</p>", err)
}
