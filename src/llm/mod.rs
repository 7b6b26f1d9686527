//! 生成式文本模型相关能力

use async_trait::async_trait;

pub mod client;
pub mod error;

pub use client::LLMClient;
pub use error::LlmError;

/// 生成式文本模型 - 单轮、无状态的文本生成
#[async_trait]
pub trait TextModel: Send + Sync {
    /// 根据prompt生成文本，两次调用之间不保留任何对话记忆
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
