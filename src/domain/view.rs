// View model - named regions the renderer projects a snapshot onto
use crate::domain::snapshot::Decision;

/// Radius of the confidence ring in the original layout. The circumference
/// derived from it is the scale for the ring's stroke offset.
pub const CONFIDENCE_RING_RADIUS: f64 = 56.0;

pub fn ring_circumference() -> f64 {
    2.0 * std::f64::consts::PI * CONFIDENCE_RING_RADIUS
}

/// Stroke offset for a confidence percentage: 0% leaves the ring empty
/// (full offset), 100% fills it (zero offset).
pub fn ring_offset(confidence_percent: f64) -> f64 {
    let circumference = ring_circumference();
    circumference - (confidence_percent / 100.0) * circumference
}

/// A trigger control that is disabled and relabeled while an asynchronous
/// operation it started is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    idle_label: String,
    busy_label: String,
    engaged: bool,
}

impl TriggerControl {
    pub fn new(idle_label: &str, busy_label: &str) -> Self {
        Self {
            idle_label: idle_label.to_string(),
            busy_label: busy_label.to_string(),
            engaged: false,
        }
    }

    pub fn engage(&mut self) {
        self.engaged = true;
    }

    pub fn release(&mut self) {
        self.engaged = false;
    }

    pub fn enabled(&self) -> bool {
        !self.engaged
    }

    pub fn label(&self) -> &str {
        if self.engaged {
            &self.busy_label
        } else {
            &self.idle_label
        }
    }
}

/// One key decision factor with its 1-based display position.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorItem {
    pub position: usize,
    pub body: String,
}

/// Everything the terminal view displays outside the chart slots. Text
/// regions keep their last rendered value until the next successful refresh
/// replaces them; a failed refresh never touches them.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub as_of_date: String,
    pub last_price: String,

    pub decision_label: String,
    pub decision: Decision,
    pub decision_color: String,
    pub confidence_percent: f64,
    pub confidence_ring_offset: f64,
    pub confidence_color: String,
    pub reasoning: String,
    pub key_factors: Vec<FactorItem>,

    pub lstm_score: String,
    pub lstm_interval: String,
    pub sentiment_score: String,
    pub sentiment_summary: String,
    pub events: Vec<String>,

    pub scenarios_found: String,
    pub success_rate: String,
    pub memory_insight: String,

    pub refresh: TriggerControl,
    pub download: TriggerControl,
    pub notice: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            as_of_date: "--".to_string(),
            last_price: "--".to_string(),
            decision_label: "--".to_string(),
            decision: Decision::Unknown,
            decision_color: Decision::Unknown.fallback_color().to_string(),
            confidence_percent: 0.0,
            confidence_ring_offset: ring_offset(0.0),
            confidence_color: Decision::Unknown.fallback_color().to_string(),
            reasoning: String::new(),
            key_factors: Vec::new(),
            lstm_score: "--".to_string(),
            lstm_interval: "--".to_string(),
            sentiment_score: "--".to_string(),
            sentiment_summary: String::new(),
            events: Vec::new(),
            scenarios_found: "--".to_string(),
            success_rate: "--".to_string(),
            memory_insight: String::new(),
            refresh: TriggerControl::new("Refresh Analysis", "Refreshing..."),
            download: TriggerControl::new("Download Report", "Retrieving..."),
            notice: None,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_offset_endpoints() {
        assert!((ring_offset(0.0) - ring_circumference()).abs() < 1e-9);
        assert!(ring_offset(100.0).abs() < 1e-9);
    }

    #[test]
    fn ring_offset_is_monotonically_decreasing() {
        let mut prev = ring_offset(0.0);
        for pct in 1..=100 {
            let offset = ring_offset(pct as f64);
            assert!(offset < prev, "offset did not decrease at {pct}%");
            prev = offset;
        }
    }

    #[test]
    fn trigger_control_restores_original_label() {
        let mut control = TriggerControl::new("Refresh Analysis", "Refreshing...");
        assert!(control.enabled());
        control.engage();
        assert!(!control.enabled());
        assert_eq!(control.label(), "Refreshing...");
        control.release();
        assert!(control.enabled());
        assert_eq!(control.label(), "Refresh Analysis");
    }
}
