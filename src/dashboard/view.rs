use serde::Serialize;

/// One bubble on the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BubblePoint {
    /// Category name in the aggregate view, game name in a drilldown.
    pub label: String,
    /// Bucket cardinality in the aggregate view; 1 per game in a drilldown.
    pub size: usize,
}

/// An entry shown in the drilldown info panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryCard {
    pub id: u64,
    pub name: String,
    pub image_ref: String,
    pub description: String,
    pub store_url: String,
}

/// Everything a front end needs to draw one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPayload {
    pub title: String,
    pub points: Vec<BubblePoint>,
    /// Whether the back control should be visible.
    pub show_back: bool,
    /// Info panel content; empty in the aggregate view.
    pub cards: Vec<EntryCard>,
}

impl ViewPayload {
    /// Largest bubble size, used to scale radii. Zero for an empty chart.
    pub fn max_size(&self) -> usize {
        self.points.iter().map(|p| p.size).max().unwrap_or(0)
    }
}
