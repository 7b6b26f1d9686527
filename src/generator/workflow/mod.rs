use crate::config::Config;
use crate::generator::agents::{EvidenceCollector, ViabilityAnalyst};
use crate::generator::context::GeneratorContext;
use crate::generator::outlet;
use crate::generator::types::{Idea, PipelineOutput, RunRecord};
use crate::llm::{LLMClient, LlmError, TextModel};
use crate::search::build_search_engine;
use crate::utils::threads::do_parallel_with_limit;

use anyhow::{Context, Result, anyhow, bail};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<&'static str, Instant>,
    phase_durations: Vec<(&'static str, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &'static str) {
        self.phase_start_times.insert(phase_name, Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &'static str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations.push((phase_name, duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 按结束顺序获取各阶段的执行时间
    pub fn get_phase_durations(&self) -> &[(&'static str, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const EVIDENCE: &'static str = "evidence";
    pub const ANALYSIS: &'static str = "analysis";
}

/// 执行一次完整的评估：先收集证据，再做可行性分析
///
/// 证据收集不会失败；分析失败时整次运行失败，已收集的证据随之丢弃。
pub async fn run_pipeline(context: &GeneratorContext, idea: Idea) -> Result<PipelineOutput> {
    let mut timing = TimingScope::new();
    let mut record = RunRecord::new(idea);
    let run_tag = short_run_tag(&record);

    eprintln!("🔎 [{}] 收集市场证据...", run_tag);
    timing.start_phase(TimingKeys::EVIDENCE);
    let evidence = EvidenceCollector.collect(context, record.idea()).await;
    timing.end_phase(TimingKeys::EVIDENCE);
    record.set_market_evidence(evidence)?;

    eprintln!("🧠 [{}] 评估可行性...", run_tag);
    timing.start_phase(TimingKeys::ANALYSIS);
    let evidence = record
        .market_evidence()
        .ok_or_else(|| anyhow!("market evidence missing before analysis"))?;
    let critique = ViabilityAnalyst
        .analyze(context, record.idea(), evidence)
        .await
        .with_context(|| format!("viability analysis failed for run {}", record.run_id()))?;
    timing.end_phase(TimingKeys::ANALYSIS);
    record.set_critique(critique)?;

    eprintln!("✅ [{}] 评估完成", run_tag);
    if context.config.verbose {
        eprint!("{}", timing.generate_timing_report());
    }

    Ok(record.into_output()?)
}

/// 并发执行多次相互独立的评估，结果顺序与输入一致
pub async fn run_batch(context: &GeneratorContext, ideas: Vec<Idea>) -> Vec<Result<PipelineOutput>> {
    let max_parallels = context.config.max_parallels;
    if ideas.len() > 1 {
        eprintln!(
            "🚀 启动批量评估，共 {} 个想法，最大并发数：{}",
            ideas.len(),
            max_parallels
        );
    }

    let futures: Vec<_> = ideas
        .into_iter()
        .map(|idea| run_pipeline(context, idea))
        .collect();
    do_parallel_with_limit(futures, max_parallels).await
}

/// 把用户输入转为想法列表，空白输入直接拒绝
pub fn parse_ideas(inputs: &[String]) -> Result<Vec<Idea>> {
    let ideas: Vec<Idea> = inputs
        .iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| Idea::new(text.as_str()))
        .collect::<Result<_, _>>()?;

    if ideas.is_empty() {
        bail!("Please enter an idea.");
    }
    Ok(ideas)
}

/// 启动评估工作流
pub async fn launch(config: &Config, inputs: &[String], check_connection: bool) -> Result<()> {
    let ideas = parse_ideas(inputs)?;
    config.validate()?;

    let client = LLMClient::new(&config.llm)?;
    if check_connection {
        client.check_connection().await?;
    }
    let model: Arc<dyn TextModel> = Arc::new(client);
    let search = build_search_engine(&config.search)?;
    let context = GeneratorContext::with_collaborators(config.clone(), model, search);

    let total = ideas.len();
    let mut outputs = Vec::with_capacity(total);
    let mut failures = 0;
    for result in run_batch(&context, ideas).await {
        match result {
            Ok(output) => outputs.push(output),
            Err(err) => {
                failures += 1;
                match err.downcast_ref::<LlmError>() {
                    Some(llm_err) => eprintln!("❌ [{}] {:#}", llm_err.kind(), err),
                    None => eprintln!("❌ {:#}", err),
                }
            }
        }
    }

    if !outputs.is_empty() {
        outlet::save(&context.config, &outputs)?;
    }

    if failures > 0 {
        bail!("{} of {} evaluation(s) failed", failures, total);
    }
    Ok(())
}

fn short_run_tag(record: &RunRecord) -> String {
    record.run_id().simple().to_string()[..8].to_string()
}
