use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// 运行记录相关错误
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("idea must not be empty")]
    EmptyIdea,
    #[error("{0} has already been written for this run")]
    AlreadyWritten(&'static str),
    #[error("{0} has not been produced yet")]
    Missing(&'static str),
}

/// 用户提交的创业想法，提交后不可修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Idea(String);

impl Idea {
    pub fn new(text: impl Into<String>) -> Result<Self, RecordError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RecordError::EmptyIdea);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Idea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 经模型整理后的市场证据（HTML片段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketEvidence(String);

impl MarketEvidence {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 可行性评估报告（HTML片段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Critique(String);

impl Critique {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Critique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单次运行的状态记录
///
/// 每次运行独立创建，每个字段只能由对应环节写入一次。
#[derive(Debug)]
pub struct RunRecord {
    run_id: Uuid,
    idea: Idea,
    market_evidence: Option<MarketEvidence>,
    critique: Option<Critique>,
}

impl RunRecord {
    pub fn new(idea: Idea) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            idea,
            market_evidence: None,
            critique: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn idea(&self) -> &Idea {
        &self.idea
    }

    pub fn market_evidence(&self) -> Option<&MarketEvidence> {
        self.market_evidence.as_ref()
    }

    pub fn critique(&self) -> Option<&Critique> {
        self.critique.as_ref()
    }

    pub fn set_market_evidence(&mut self, evidence: MarketEvidence) -> Result<(), RecordError> {
        if self.market_evidence.is_some() {
            return Err(RecordError::AlreadyWritten("market_evidence"));
        }
        self.market_evidence = Some(evidence);
        Ok(())
    }

    pub fn set_critique(&mut self, critique: Critique) -> Result<(), RecordError> {
        if self.critique.is_some() {
            return Err(RecordError::AlreadyWritten("critique"));
        }
        self.critique = Some(critique);
        Ok(())
    }

    /// 两个环节都完成后转为最终输出
    pub fn into_output(self) -> Result<PipelineOutput, RecordError> {
        let market_evidence = self
            .market_evidence
            .ok_or(RecordError::Missing("market_evidence"))?;
        let critique = self.critique.ok_or(RecordError::Missing("critique"))?;
        Ok(PipelineOutput {
            run_id: self.run_id,
            idea: self.idea,
            market_evidence,
            critique,
        })
    }
}

/// 一次完整运行的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub run_id: Uuid,
    pub idea: Idea,
    pub market_evidence: MarketEvidence,
    pub critique: Critique,
}
