// View renderer - projects a snapshot onto the view model and chart slots
use crate::application::charts::{ChartSlotId, ChartSlots};
use crate::domain::snapshot::{DashboardSnapshot, Decision};
use crate::domain::view::{ring_offset, FactorItem, ViewState};

const PREDICTION_LINE_COLOR: &str = "#22c55e";
const SENTIMENT_LINE_COLOR: &str = "#4f46e5";

/// Replace every rendered region with the snapshot's values. Idempotent:
/// applying the same snapshot twice leaves the view and charts in the same
/// state as applying it once. Never fails for well-formed input.
pub fn apply_snapshot(snapshot: &DashboardSnapshot, view: &mut ViewState, charts: &mut ChartSlots) {
    view.as_of_date = snapshot.main_info.date.clone();
    view.last_price = snapshot.main_info.last_price.clone();

    let decision = &snapshot.main_decision;
    view.decision_label = decision.decision.clone();
    view.decision = Decision::parse(&decision.decision);
    view.decision_color = decision.decision_color.clone();
    view.confidence_percent = decision.confidence;
    view.confidence_ring_offset = ring_offset(decision.confidence);
    view.confidence_color = decision.confidence_color.clone();
    view.reasoning = decision.ai_reasoning.clone();

    // Clear-then-repopulate, order preserved, positions 1-based.
    view.key_factors = decision
        .key_factors
        .iter()
        .enumerate()
        .map(|(i, body)| FactorItem {
            position: i + 1,
            body: body.clone(),
        })
        .collect();

    let lstm = &snapshot.lstm_prediction;
    view.lstm_score = format!("{:.2}", lstm.prediction_score);
    view.lstm_interval = lstm.prediction_interval.clone();
    charts.render_series(
        ChartSlotId::Prediction,
        &lstm.chart_data,
        &lstm.chart_labels,
        PREDICTION_LINE_COLOR,
        "LSTM Prediction",
    );

    let sentiment = &snapshot.social_sentiment;
    view.sentiment_score = format!("{:.3}", sentiment.sentiment_score);
    view.sentiment_summary = sentiment.summary.clone();
    charts.render_series(
        ChartSlotId::SentimentTrend,
        &sentiment.chart_data,
        &sentiment.chart_labels,
        SENTIMENT_LINE_COLOR,
        "Sentiment Trend",
    );

    view.events = snapshot.event_impact.events.clone();

    let memory = &snapshot.memory_bank;
    view.scenarios_found = memory.scenarios_found.to_string();
    view.success_rate = format!("{}%", memory.success_rate);
    view.memory_insight = memory.insight.clone();
}
