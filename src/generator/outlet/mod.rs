use crate::config::{Config, OutputFormat};
use crate::generator::score::{ScoreBand, extract_viability_score};
use crate::generator::types::PipelineOutput;
use crate::i18n::TargetLanguage;
use crate::utils::markup::escape_html;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

/// 保存评估结果，未指定输出路径时写到标准输出
pub fn save(config: &Config, outputs: &[PipelineOutput]) -> Result<()> {
    let content = outlet_for(config).render(outputs)?;

    match &config.output_path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory {:?}", parent))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            eprintln!("💾 报告已保存到 {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// 根据输出格式选择渲染方式
pub fn outlet_for(config: &Config) -> Box<dyn Outlet> {
    match config.output_format {
        OutputFormat::Text => Box::new(TextOutlet),
        OutputFormat::Html => Box::new(HtmlOutlet::new(config.target_language.clone())),
        OutputFormat::Json => Box::new(JsonOutlet),
    }
}

pub trait Outlet {
    fn render(&self, outputs: &[PipelineOutput]) -> Result<String>;
}

/// 终端纯文本输出，两段HTML片段原样输出
pub struct TextOutlet;

impl Outlet for TextOutlet {
    fn render(&self, outputs: &[PipelineOutput]) -> Result<String> {
        let mut content = String::new();
        for output in outputs {
            content.push_str(&format!("=== 💡 {} ===\n", output.idea));
            if let Some(score) = extract_viability_score(&output.critique) {
                content.push_str(&format!(
                    "Viability: {}% ({})\n",
                    score,
                    ScoreBand::from_score(score).label()
                ));
            }
            content.push_str("\n🔗 Evidence\n");
            content.push_str(output.market_evidence.as_str());
            content.push_str("\n\n📋 Strategic Analysis\n");
            content.push_str(output.critique.as_str());
            content.push_str("\n\n");
        }
        Ok(content)
    }
}

/// 独立HTML文档，每个想法一组证据与分析容器
pub struct HtmlOutlet {
    language: TargetLanguage,
}

impl HtmlOutlet {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }
}

impl Outlet for HtmlOutlet {
    fn render(&self, outputs: &[PipelineOutput]) -> Result<String> {
        let mut body = String::new();
        for output in outputs {
            body.push_str(&format!(
                r#"<section class="run" data-run-id="{run_id}">
<h1>{idea}</h1>
<div class="result-card card-left"><h2>🔗 Evidence</h2>{evidence}</div>
<div class="result-card card-right"><h2>📋 Strategic Analysis</h2>{critique}</div>
</section>
"#,
                run_id = output.run_id,
                idea = escape_html(output.idea.as_str()),
                evidence = output.market_evidence,
                critique = output.critique,
            ));
        }

        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>Blindspot Report</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            self.language.html_lang(),
            body
        ))
    }
}

/// JSON输出，附带读取到的分数
pub struct JsonOutlet;

#[derive(Serialize)]
struct JsonReport<'a> {
    run_id: Uuid,
    idea: &'a str,
    score: Option<i64>,
    band: Option<ScoreBand>,
    market_evidence: &'a str,
    critique: &'a str,
}

impl Outlet for JsonOutlet {
    fn render(&self, outputs: &[PipelineOutput]) -> Result<String> {
        let reports: Vec<JsonReport<'_>> = outputs
            .iter()
            .map(|output| {
                let score = extract_viability_score(&output.critique);
                JsonReport {
                    run_id: output.run_id,
                    idea: output.idea.as_str(),
                    score,
                    band: score.map(ScoreBand::from_score),
                    market_evidence: output.market_evidence.as_str(),
                    critique: output.critique.as_str(),
                }
            })
            .collect();
        let mut content = serde_json::to_string_pretty(&reports)?;
        content.push('\n');
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::types::{Critique, Idea, MarketEvidence, RunRecord};
    use tempfile::TempDir;

    fn sample_output(idea: &str, critique: &str) -> PipelineOutput {
        let mut record = RunRecord::new(Idea::new(idea).unwrap());
        record
            .set_market_evidence(MarketEvidence::new(
                "<ul><li><a href='https://a.example' target='_blank'>A</a> - summary</li></ul>",
            ))
            .unwrap();
        record.set_critique(Critique::new(critique)).unwrap();
        record.into_output().unwrap()
    }

    #[test]
    fn test_text_outlet() {
        let output = sample_output("dog bakery", r#"<div class="score-box">Viability: 80%</div>"#);
        let text = TextOutlet.render(&[output]).unwrap();

        assert!(text.contains("=== 💡 dog bakery ==="));
        assert!(text.contains("Viability: 80% (strong)"));
        assert!(text.contains("🔗 Evidence\n<ul>"));
        assert!(text.contains("📋 Strategic Analysis\n<div class=\"score-box\">"));
    }

    #[test]
    fn test_html_outlet_escapes_idea_only() {
        let output = sample_output("<script>tools</script>", "<h3>Report</h3>");
        let html = HtmlOutlet::new(TargetLanguage::French)
            .render(&[output])
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"fr\">"));
        assert!(html.contains("<h1>&lt;script&gt;tools&lt;/script&gt;</h1>"));
        assert!(html.contains("<h2>📋 Strategic Analysis</h2><h3>Report</h3>"));
        assert!(html.contains("<a href='https://a.example' target='_blank'>A</a>"));
    }

    #[test]
    fn test_json_outlet_includes_score() {
        let outputs = vec![
            sample_output("dog bakery", "Viability: 45%"),
            sample_output("cat cafe", "<p>no score given</p>"),
        ];
        let json = JsonOutlet.render(&outputs).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["idea"], "dog bakery");
        assert_eq!(value[0]["score"], 45);
        assert_eq!(value[0]["band"], "risky");
        assert!(value[1]["score"].is_null());
        assert!(value[1]["band"].is_null());
    }

    #[test]
    fn test_save_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            output_format: OutputFormat::Json,
            output_path: Some(temp_dir.path().join("reports").join("run.json")),
            ..Default::default()
        };

        save(&config, &[sample_output("dog bakery", "Viability: 70%")]).unwrap();

        let written =
            std::fs::read_to_string(temp_dir.path().join("reports").join("run.json")).unwrap();
        assert!(written.contains("\"score\": 70"));
    }
}
