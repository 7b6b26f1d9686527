use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use blindspot::config::{Config, ConfigError, OutputFormat};
use blindspot::generator::context::GeneratorContext;
use blindspot::generator::outlet;
use blindspot::generator::prompts::NO_LINKS_PLACEHOLDER;
use blindspot::generator::score::extract_viability_score;
use blindspot::generator::workflow::{launch, run_batch, run_pipeline};
use blindspot::llm::{LlmError, TextModel};
use blindspot::search::{SearchEngine, SearchError, SearchResults};
use blindspot::Idea;
use tempfile::TempDir;

/// 模拟模型：调研环节按要求返回占位，分析环节返回完整的报告模板
struct RubricFollowingModel {
    calls: Mutex<Vec<String>>,
}

impl RubricFollowingModel {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextModel for RubricFollowingModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if prompt.starts_with("You are a Web Researcher.") {
            return Ok(format!("```html\n{}\n```", NO_LINKS_PLACEHOLDER));
        }
        Ok(r#"```html
<div class="score-box" style="color: #dc3545">Viability: 45%</div>
<h3>📊 Market Reality</h3>
<p>Red Ocean for scissors, Blue Ocean for the subscription angle.</p>
<h3>⚠️ The Blindspots (Why it might fail)</h3>
<ul>
  <li>People rarely need a new pair of scissors every month.</li>
  <li>Shipping costs outweigh the product value.</li>
</ul>
<h3>💡 The Pivot (How to fix it)</h3>
<p>Sell a one-off left-handed craft kit to schools instead.</p>
```"#
            .to_string())
    }
}

/// 返回空结果的搜索
struct EmptySearch;

#[async_trait]
impl SearchEngine for EmptySearch {
    fn name(&self) -> &str {
        "empty"
    }

    async fn search(&self, _query: &str, _max_results: usize) -> Result<SearchResults, SearchError> {
        Ok(SearchResults::default())
    }
}

/// 两种调用方式都失败的搜索
struct OfflineSearch;

#[async_trait]
impl SearchEngine for OfflineSearch {
    fn name(&self) -> &str {
        "offline"
    }

    async fn search(&self, _query: &str, _max_results: usize) -> Result<SearchResults, SearchError> {
        Err(SearchError::Transport("network unreachable".to_string()))
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.llm.api_key = "test-key".to_string();
    config.search.year_marker = Some(2025);
    config
}

#[tokio::test]
async fn test_left_handed_scissors_scenario() {
    let model = Arc::new(RubricFollowingModel::new());
    let context =
        GeneratorContext::with_collaborators(test_config(), model.clone(), Arc::new(EmptySearch));

    let output = run_pipeline(
        &context,
        Idea::new("subscription box for left-handed scissors").unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(output.market_evidence.as_str(), NO_LINKS_PLACEHOLDER);

    let critique = output.critique.as_str();
    assert!(!critique.is_empty());
    assert!(!critique.contains("```"));
    assert!(extract_viability_score(&output.critique).is_some());
    assert!(critique.contains("<li>"));

    // 分析prompt中使用的是占位证据
    let calls = model.calls.lock().unwrap();
    let analysis_prompt = calls.last().unwrap();
    assert!(analysis_prompt.contains(&format!("Market Evidence: {}", NO_LINKS_PLACEHOLDER)));
}

#[tokio::test]
async fn test_offline_search_still_produces_report() {
    let context = GeneratorContext::with_collaborators(
        test_config(),
        Arc::new(RubricFollowingModel::new()),
        Arc::new(OfflineSearch),
    );

    let output = run_pipeline(&context, Idea::new("smart compost bin").unwrap())
        .await
        .unwrap();

    // 默认的备选调用方式不受支持，提示中带的是最后一次的错误
    assert!(
        output
            .market_evidence
            .as_str()
            .starts_with("<p>⚠️ Search connection error:")
    );
    assert!(output.market_evidence.as_str().contains("does not support"));
    assert!(extract_viability_score(&output.critique).is_some());
}

#[tokio::test]
async fn test_batch_and_html_outlet() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config();
    config.output_format = OutputFormat::Html;
    config.output_path = Some(temp_dir.path().join("report.html"));
    config.max_parallels = 2;

    let context = GeneratorContext::with_collaborators(
        config.clone(),
        Arc::new(RubricFollowingModel::new()),
        Arc::new(EmptySearch),
    );

    let ideas = vec![
        Idea::new("meal kits for cats").unwrap(),
        Idea::new("drone window cleaning").unwrap(),
    ];
    let outputs: Vec<_> = run_batch(&context, ideas)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_ne!(outputs[0].run_id, outputs[1].run_id);

    outlet::save(&config, &outputs).unwrap();

    let html = std::fs::read_to_string(temp_dir.path().join("report.html")).unwrap();
    assert!(html.contains("<h1>meal kits for cats</h1>"));
    assert!(html.contains("<h1>drone window cleaning</h1>"));
    assert_eq!(html.matches("class=\"score-box\"").count(), 2);
}

#[tokio::test]
async fn test_launch_rejects_empty_input() {
    let config = test_config();
    let result = launch(&config, &["   ".to_string()], false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_launch_refuses_to_start_without_credential() {
    let mut config = test_config();
    config.llm.api_key = String::new();

    let err = launch(&config, &["dog bakery".to_string()], false)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingCredential { .. })
    ));
}
