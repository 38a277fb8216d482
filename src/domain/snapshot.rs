// Dashboard snapshot - the complete analysis payload from the backend
use serde::{Deserialize, Deserializer};

/// One complete, internally consistent payload from `/dashboard_data`.
/// Replaces any prior payload wholesale; never merged partially.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSnapshot {
    pub main_info: MainInfo,
    pub main_decision: MainDecision,
    pub lstm_prediction: LstmPrediction,
    pub social_sentiment: SocialSentiment,
    pub event_impact: EventImpact,
    pub memory_bank: MemoryBank,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainInfo {
    pub date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub last_price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainDecision {
    pub decision: String,
    pub decision_color: String,
    pub confidence: f64,
    pub confidence_color: String,
    pub ai_reasoning: String,
    #[serde(default)]
    pub key_factors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LstmPrediction {
    pub prediction_score: f64,
    pub prediction_interval: String,
    #[serde(default)]
    pub chart_data: Vec<f64>,
    #[serde(default)]
    pub chart_labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialSentiment {
    pub sentiment_score: f64,
    #[serde(default)]
    pub chart_data: Vec<f64>,
    #[serde(default)]
    pub chart_labels: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventImpact {
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryBank {
    pub scenarios_found: i64,
    pub success_rate: f64,
    pub insight: String,
}

/// The investment call carried by a snapshot. Anything the backend sends
/// outside the three known labels maps to `Unknown`, which gets a neutral
/// visual treatment rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Buy,
    Sell,
    Hold,
    Unknown,
}

impl Decision {
    /// Case-insensitive match against BUY / SELL / HOLD.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "BUY" => Decision::Buy,
            "SELL" => Decision::Sell,
            "HOLD" => Decision::Hold,
            _ => Decision::Unknown,
        }
    }

    /// Terminal glyph standing in for the original decision icons.
    pub fn glyph(self) -> &'static str {
        match self {
            Decision::Buy => "▲",
            Decision::Sell => "▼",
            Decision::Hold => "●",
            Decision::Unknown => "⚠",
        }
    }

    /// Palette color used when the backend omits or garbles `decision_color`.
    pub fn fallback_color(self) -> &'static str {
        match self {
            Decision::Buy => "#22c55e",
            Decision::Sell => "#ef4444",
            Decision::Hold => "#f59e0b",
            Decision::Unknown => "#94a3b8",
        }
    }
}

// The backend emits `last_price` as a bare number; older payloads carried a
// preformatted string. Accept both and keep the display form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for last_price, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_parse_is_case_insensitive() {
        for label in ["BUY", "buy", "Buy", " bUy "] {
            assert_eq!(Decision::parse(label), Decision::Buy);
        }
        for label in ["SELL", "sell", "Sell"] {
            assert_eq!(Decision::parse(label), Decision::Sell);
        }
        for label in ["HOLD", "hold", "hOLd"] {
            assert_eq!(Decision::parse(label), Decision::Hold);
        }
    }

    #[test]
    fn decision_parse_defaults_to_unknown() {
        for label in ["", "MAYBE", "buy now", "??", "h o l d"] {
            assert_eq!(Decision::parse(label), Decision::Unknown);
        }
    }

    #[test]
    fn snapshot_decodes_backend_payload() {
        let body = serde_json::json!({
            "main_info": { "date": "09-09-2025", "last_price": 27.85 },
            "main_decision": {
                "decision": "BUY",
                "decision_color": "#22c55e",
                "confidence": 82,
                "confidence_color": "#4f46e5",
                "ai_reasoning": "Momentum and sentiment both positive.",
                "key_factors": ["LSTM uptrend", "Positive news flow"]
            },
            "lstm_prediction": {
                "prediction_score": 28.114,
                "prediction_interval": "27.2 - 29.0",
                "chart_data": [27.1, 27.4, 27.9],
                "chart_labels": ["Day -2", "Day -1", "Today"]
            },
            "social_sentiment": {
                "sentiment_score": 0.6421,
                "chart_data": [0.5, 0.6, 0.64],
                "chart_labels": ["Week -2", "Week -1", "Current"],
                "summary": "Positive sentiment"
            },
            "event_impact": { "events": ["Earnings call scheduled"] },
            "memory_bank": {
                "scenarios_found": 4,
                "success_rate": 75.0,
                "insight": "Similar setups resolved upward."
            }
        });

        let snapshot: DashboardSnapshot = serde_json::from_value(body).unwrap();
        assert_eq!(snapshot.main_info.last_price, "27.85");
        assert_eq!(Decision::parse(&snapshot.main_decision.decision), Decision::Buy);
        assert_eq!(
            snapshot.lstm_prediction.chart_data.len(),
            snapshot.lstm_prediction.chart_labels.len()
        );
        assert_eq!(snapshot.memory_bank.scenarios_found, 4);
    }

    #[test]
    fn last_price_accepts_preformatted_string() {
        let info: MainInfo =
            serde_json::from_value(serde_json::json!({ "date": "d", "last_price": "27.85 SAR" }))
                .unwrap();
        assert_eq!(info.last_price, "27.85 SAR");
    }
}
