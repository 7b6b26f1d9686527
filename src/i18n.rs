use serde::{Deserialize, Serialize};

/// 报告语言
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ru")]
    Russian,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::Korean => write!(f, "ko"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "ko" | "korean" | "한국어" | "韩文" => Ok(TargetLanguage::Korean),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "ru" | "russian" | "русский" | "俄文" => Ok(TargetLanguage::Russian),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::Chinese => "中文",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::Korean => "한국어",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
            TargetLanguage::Russian => "Русский",
        }
    }

    /// 获取报告语言的提示词指令，英文报告不需要额外指令
    pub fn prompt_instruction(&self) -> Option<&'static str> {
        match self {
            TargetLanguage::English => None,
            TargetLanguage::Chinese => Some(
                "请使用中文撰写报告正文，保持HTML结构和class名称不变，Viability分数行保持原样。",
            ),
            TargetLanguage::Japanese => Some(
                "レポート本文は日本語で書いてください。HTML構造とclass名、Viabilityのスコア行はそのまま維持してください。",
            ),
            TargetLanguage::Korean => Some(
                "보고서 본문은 한국어로 작성해 주세요. HTML 구조와 class 이름, Viability 점수 줄은 그대로 유지해 주세요.",
            ),
            TargetLanguage::German => Some(
                "Bitte verfassen Sie den Berichtstext auf Deutsch. Behalten Sie die HTML-Struktur, die Klassennamen und die Viability-Zeile unverändert bei.",
            ),
            TargetLanguage::French => Some(
                "Veuillez rédiger le rapport en français. Conservez la structure HTML, les noms de classes et la ligne Viability telles quelles.",
            ),
            TargetLanguage::Russian => Some(
                "Пожалуйста, напишите текст отчёта на русском языке. Сохраните HTML-структуру, имена классов и строку Viability без изменений.",
            ),
        }
    }

    /// HTML文档的lang属性
    pub fn html_lang(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_english_without_instruction() {
        let language = TargetLanguage::default();
        assert_eq!(language, TargetLanguage::English);
        assert!(language.prompt_instruction().is_none());
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("中文".parse::<TargetLanguage>().unwrap(), TargetLanguage::Chinese);
        assert_eq!("Deutsch".parse::<TargetLanguage>().unwrap(), TargetLanguage::German);
        assert_eq!("fr".parse::<TargetLanguage>().unwrap(), TargetLanguage::French);
        assert!("klingon".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_non_english_instruction_keeps_score_line() {
        let instruction = TargetLanguage::French.prompt_instruction().unwrap();
        assert!(instruction.contains("Viability"));
        assert_eq!(TargetLanguage::French.display_name(), "Français");
    }
}
