use thiserror::Error;

/// 模型调用错误分类
#[derive(Debug, Error)]
pub enum LlmError {
    /// 网络抖动、超时、服务端5xx等
    #[error("transient model service error: {0}")]
    Transient(String),
    /// 配额耗尽或触发限流
    #[error("model service quota or rate limit exceeded: {0}")]
    RateLimited(String),
    /// 响应无法解析或内容缺失
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
    /// 凭据、模型名等配置问题
    #[error("model client misconfigured: {0}")]
    Configuration(String),
}

const RATE_LIMIT_MARKERS: &[&str] = &[
    "429",
    "rate limit",
    "rate_limit",
    "ratelimit",
    "quota",
    "resource_exhausted",
    "resource exhausted",
    "too many requests",
];

const CONFIGURATION_MARKERS: &[&str] = &[
    "401",
    "403",
    "unauthorized",
    "forbidden",
    "api key",
    "api_key",
    "apikey",
    "permission denied",
    "permission_denied",
    "unauthenticated",
    "model not found",
    "no such model",
];

const MALFORMED_MARKERS: &[&str] = &[
    "json",
    "deserializ",
    "missing field",
    "unexpected response",
    "invalid response",
    "no message",
    "empty response",
];

impl LlmError {
    /// 将provider返回的原始错误归类
    ///
    /// rig-core的错误只有文本可用，这里按错误信息中的关键字判定，
    /// 无法判定的一律视为瞬时错误。
    pub fn classify(err: &anyhow::Error) -> Self {
        let message = format!("{:#}", err);
        let lower = message.to_lowercase();

        if contains_any(&lower, RATE_LIMIT_MARKERS) {
            LlmError::RateLimited(message)
        } else if contains_any(&lower, CONFIGURATION_MARKERS) {
            LlmError::Configuration(message)
        } else if contains_any(&lower, MALFORMED_MARKERS) {
            LlmError::MalformedResponse(message)
        } else {
            LlmError::Transient(message)
        }
    }

    /// 错误种类的简短标识，用于日志和JSON输出
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Transient(_) => "transient",
            LlmError::RateLimited(_) => "rate_limited",
            LlmError::MalformedResponse(_) => "malformed_response",
            LlmError::Configuration(_) => "configuration",
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
