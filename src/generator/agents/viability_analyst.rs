use crate::generator::context::GeneratorContext;
use crate::generator::prompts::analysis_prompt;
use crate::generator::types::{Critique, Idea, MarketEvidence};
use crate::llm::LlmError;
use crate::utils::markup::strip_markup_fences;

/// 可行性分析师 - 按评分细则给出分数、市场判断、风险与转型建议
///
/// 模型调用只进行一次，失败直接返回给调用方，不做重试或降级。
/// 分数完全由模型生成，这里不做任何校验或截断。
#[derive(Default)]
pub struct ViabilityAnalyst;

impl ViabilityAnalyst {
    pub async fn analyze(
        &self,
        context: &GeneratorContext,
        idea: &Idea,
        evidence: &MarketEvidence,
    ) -> Result<Critique, LlmError> {
        let prompt = analysis_prompt(idea, evidence, &context.config.target_language);
        let response = context.model.generate(&prompt).await?;
        Ok(Critique::new(strip_markup_fences(&response)))
    }
}
