// Chart lifecycle manager - one live rendering target per named slot
use std::collections::HashMap;

/// The two chart slots the dashboard renders into. A closed set: there is
/// no way to address a slot that has no render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlotId {
    Prediction,
    SentimentTrend,
}

/// A live line-chart instance bound to a slot. Holds everything the terminal
/// needs to draw it: points as (index, value), x labels, hex line color and
/// title. `instance_id` is unique per construction, so replacement (rather
/// than in-place mutation) is observable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    pub title: String,
    pub line_color: String,
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<String>,
    pub instance_id: u64,
}

impl ChartHandle {
    /// X-axis bounds covering every point; a single point still gets a
    /// non-degenerate span.
    pub fn x_bounds(&self) -> [f64; 2] {
        let max = (self.points.len().saturating_sub(1)) as f64;
        [0.0, max.max(1.0)]
    }

    /// Y-axis bounds with a little headroom. An empty or flat series gets a
    /// unit span so the axis stays drawable.
    pub fn y_bounds(&self) -> [f64; 2] {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &(_, y) in &self.points {
            min = min.min(y);
            max = max.max(y);
        }
        if !min.is_finite() || !max.is_finite() {
            return [0.0, 1.0];
        }
        let pad = ((max - min) * 0.1).max(0.1);
        [min - pad, max + pad]
    }
}

/// Owns every live chart handle. Each slot holds zero or one; rendering a
/// slot that already has a handle destroys it before binding the
/// replacement, so repeated refreshes never grow the live-instance count.
#[derive(Debug, Default)]
pub struct ChartSlots {
    slots: HashMap<ChartSlotId, ChartHandle>,
    next_instance_id: u64,
}

impl ChartSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a series into a slot, replacing any prior instance. An empty
    /// series renders an empty chart, not an error. Values beyond the label
    /// count (or vice versa) are ignored pairwise.
    pub fn render_series(
        &mut self,
        slot: ChartSlotId,
        values: &[f64],
        labels: &[String],
        line_color: &str,
        title: &str,
    ) -> &ChartHandle {
        // Destroy the old instance before the replacement exists.
        if let Some(old) = self.slots.remove(&slot) {
            tracing::debug!("replacing chart instance {} in {:?}", old.instance_id, slot);
        }

        let points = values
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (&value, _))| (i as f64, value))
            .collect();

        let instance_id = self.next_instance_id;
        self.next_instance_id += 1;

        let handle = ChartHandle {
            title: title.to_string(),
            line_color: line_color.to_string(),
            points,
            labels: labels[..labels.len().min(values.len())].to_vec(),
            instance_id,
        };
        self.slots.entry(slot).or_insert(handle)
    }

    pub fn get(&self, slot: ChartSlotId) -> Option<&ChartHandle> {
        self.slots.get(&slot)
    }

    /// Number of live chart instances across all slots.
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    /// Tear down every live instance. Only exercised when the view goes away.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
