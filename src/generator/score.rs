//! 从报告中读取模型给出的分数
//!
//! 分数只用于摘要展示，原样读取，不截断、不重算。

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::generator::types::Critique;

static VIABILITY_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)viability\s*:\s*~?\s*(-?\d+)\s*%").unwrap());

/// 读取报告中第一个 `Viability: N%` 标记
pub fn extract_viability_score(critique: &Critique) -> Option<i64> {
    VIABILITY_SCORE
        .captures(critique.as_str())
        .and_then(|c| c[1].parse().ok())
}

/// 与报告分数颜色一致的分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Risky,
}

impl ScoreBand {
    pub fn from_score(score: i64) -> Self {
        if score > 75 {
            ScoreBand::Strong
        } else if score > 55 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Risky
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Moderate => "moderate",
            ScoreBand::Risky => "risky",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_score_from_score_box() {
        let critique = Critique::new(
            r#"<div class="score-box" style="color: #ff9900">Viability: 70%</div><h3>📊 Market Reality</h3>"#,
        );
        assert_eq!(extract_viability_score(&critique), Some(70));
    }

    #[test]
    fn test_score_outside_range_is_kept() {
        assert_eq!(
            extract_viability_score(&Critique::new("Viability: 110%")),
            Some(110)
        );
        assert_eq!(
            extract_viability_score(&Critique::new("VIABILITY : -5 %")),
            Some(-5)
        );
    }

    #[test]
    fn test_missing_score() {
        assert_eq!(extract_viability_score(&Critique::new("<p>no score</p>")), None);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(ScoreBand::from_score(76), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(75), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(56), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(55), ScoreBand::Risky);
        assert_eq!(ScoreBand::from_score(-20).label(), "risky");
    }
}
