//! 调研与分析两个环节使用的prompt

use crate::generator::types::{Idea, MarketEvidence};
use crate::i18n::TargetLanguage;
use crate::search::SearchResults;

/// 搜索无结果时的固定占位
pub const NO_LINKS_PLACEHOLDER: &str = "<p>No direct links found. Analysis based on logic.</p>";

/// 调研环节最多保留的来源数量
pub const MAX_EVIDENCE_SOURCES: usize = 3;

/// 由想法拼出面向市场调研的搜索查询
pub fn build_search_query(idea: &Idea, year: i32) -> String {
    format!(
        "market demand for {} competitors failure risks {}",
        idea.as_str(),
        year
    )
}

/// 把原始搜索结果压缩成来源列表的prompt
pub fn research_prompt(idea: &Idea, raw_results: &SearchResults) -> String {
    format!(
        r#"You are a Web Researcher. Raw Results: {raw_results}
Task: List {max} Relevant Sources for "{idea}".
Format: HTML List `<ul><li><a href='URL' target='_blank'>TITLE</a> - Summary</li></ul>`.
If no links, return: `{placeholder}`"#,
        raw_results = raw_results,
        max = MAX_EVIDENCE_SOURCES,
        idea = idea.as_str(),
        placeholder = NO_LINKS_PLACEHOLDER,
    )
}

const SCORING_RUBRIC: &str = r#"SCORING RUBRIC (Base = 65/100):
- **Base Score:** Start at 65. (This is a "Passing" grade).
- **Bonuses:**
  - +15 if it solves an URGENT problem (Health, Money, Time).
  - +10 if it is UNIQUE or Innovative.
  - +5 if the market is Growing.
- **Penalties:**
  - -10 if the market is Very Crowded/Saturated.
  - -20 if it is Vague or physically Impossible.
  - -10 if Legal risks are high.

**Examples:**
- A standard Coffee Shop = 65 (Base) - 10 (Crowded) + 15 (Urgent need for coffee) = ~70% (Solid).
- A cure for Cancer = 65 + 15 + 10 = 90% (Excellent).
- A DVD Store = 65 - 20 (Obsolete) = 45% (Risk)."#;

const OUTPUT_TEMPLATE: &str = r#"OUTPUT FORMAT (HTML):
1. <div class="score-box" style="color: [IF SCORE > 75 THEN #28a745 ELSE IF SCORE > 55 THEN #ff9900 ELSE #dc3545]">Viability: [Score]%</div>

2. <h3>📊 Market Reality</h3>
   <p>[Is this a Blue Ocean (new) or Red Ocean (crowded)? Be honest.]</p>

3. <h3>⚠️ The Blindspots (Why it might fail)</h3>
   <ul>
     <li>[Risk 1]</li>
     <li>[Risk 2]</li>
   </ul>

4. <h3>💡 The Pivot (How to fix it)</h3>
   <p>[One specific suggestion to improve the score]</p>"#;

/// 按评分细则生成可行性报告的prompt
pub fn analysis_prompt(idea: &Idea, evidence: &MarketEvidence, language: &TargetLanguage) -> String {
    let mut prompt = format!(
        "You are a Strategic Business Consultant.\n\
         User Idea: {}\n\
         Market Evidence: {}\n\n\
         TASK: Calculate a Viability Score and write a report.\n\n\
         {}\n\n\
         {}",
        idea.as_str(),
        evidence.as_str(),
        SCORING_RUBRIC,
        OUTPUT_TEMPLATE,
    );

    if let Some(instruction) = language.prompt_instruction() {
        prompt.push_str("\n\n");
        prompt.push_str(instruction);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchHit;

    fn idea() -> Idea {
        Idea::new("subscription box for left-handed scissors").unwrap()
    }

    #[test]
    fn test_search_query_keywords() {
        assert_eq!(
            build_search_query(&idea(), 2025),
            "market demand for subscription box for left-handed scissors competitors failure risks 2025"
        );
    }

    #[test]
    fn test_research_prompt_embeds_results_and_placeholder() {
        let results = SearchResults(vec![SearchHit {
            title: "Lefty".to_string(),
            url: "https://lefty.example".to_string(),
            snippet: "left-handed goods".to_string(),
        }]);

        let prompt = research_prompt(&idea(), &results);
        assert!(prompt.contains("https://lefty.example"));
        assert!(prompt.contains("List 3 Relevant Sources for \"subscription box for left-handed scissors\""));
        assert!(prompt.contains(NO_LINKS_PLACEHOLDER));
    }

    #[test]
    fn test_analysis_prompt_contains_rubric_and_inputs() {
        let evidence = MarketEvidence::new("<ul><li>source</li></ul>");
        let prompt = analysis_prompt(&idea(), &evidence, &TargetLanguage::English);

        assert!(prompt.contains("User Idea: subscription box for left-handed scissors"));
        assert!(prompt.contains("Market Evidence: <ul><li>source</li></ul>"));
        assert!(prompt.contains("Start at 65"));
        assert!(prompt.contains("+15 if it solves an URGENT problem"));
        assert!(prompt.contains("-20 if it is Vague"));
        assert!(prompt.contains("A DVD Store = 65 - 20"));
        assert!(prompt.contains(r#"<div class="score-box""#));
        assert!(prompt.contains("The Pivot"));
        assert!(!prompt.contains("Bitte"));
    }

    #[test]
    fn test_analysis_prompt_appends_language_instruction() {
        let evidence = MarketEvidence::new(NO_LINKS_PLACEHOLDER);
        let prompt = analysis_prompt(&idea(), &evidence, &TargetLanguage::German);
        assert!(prompt.ends_with(TargetLanguage::German.prompt_instruction().unwrap()));
    }
}
