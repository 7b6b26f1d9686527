use std::sync::Arc;

use crate::{config::Config, llm::TextModel, search::SearchEngine};

/// 进程内共享的只读上下文，不保存任何运行状态
#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 生成式文本模型
    pub model: Arc<dyn TextModel>,
    /// 网络搜索能力
    pub search: Arc<dyn SearchEngine>,
}

impl GeneratorContext {
    /// 使用给定的模型与搜索实现创建上下文
    pub fn with_collaborators(
        config: Config,
        model: Arc<dyn TextModel>,
        search: Arc<dyn SearchEngine>,
    ) -> Self {
        Self {
            config,
            model,
            search,
        }
    }
}
