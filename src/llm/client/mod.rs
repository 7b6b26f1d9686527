//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::{LlmError, TextModel};

mod providers;

use providers::ProviderClient;

/// 所有调用共用的系统提示词，具体角色由各环节的prompt自行描述
const SYSTEM_PREAMBLE: &str =
    "Follow the user's instructions exactly and answer only with the requested output.";

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self, LlmError> {
        let client =
            ProviderClient::new(config).map_err(|e| LlmError::Configuration(format!("{:#}", e)))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<(), LlmError> {
        eprintln!("🔄 正在检查模型连接...");
        match self.generate("Reply with the single word: pong").await {
            Ok(_) => {
                eprintln!("✅ 模型连接正常 ({} / {})", self.config.provider, self.config.model);
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 单轮对话，超时视为瞬时错误
    async fn prompt_once(&self, user_prompt: &str) -> Result<String, LlmError> {
        let agent = self
            .client
            .create_agent(&self.config.model, SYSTEM_PREAMBLE, &self.config);

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        match tokio::time::timeout(timeout, agent.prompt(user_prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(LlmError::classify(&e)),
            Err(_) => Err(LlmError::Transient(format!(
                "no response from {} within {}s",
                self.config.provider, self.config.timeout_seconds
            ))),
        }
    }
}

#[async_trait]
impl TextModel for LLMClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompt_once(prompt).await
    }
}
