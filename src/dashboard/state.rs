use super::sampling::{sample_bucket, DrilldownSampling};
use super::view::{BubblePoint, EntryCard, ViewPayload};
use crate::pipeline::DashboardContext;
use serde::Serialize;

/// Which view the dashboard is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "category", rename_all = "snake_case")]
pub enum ViewState {
    /// One bubble per category.
    Aggregate,
    /// A sample of the entries of one category.
    Drilldown(String),
}

/// User interactions the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// A category bubble was chosen; carries the bubble's label.
    SelectCategory(String),
    /// The back control was used.
    Back,
}

/// Knobs for how views are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Maximum number of entry cards in a drilldown.
    pub drilldown_limit: usize,
    pub sampling: DrilldownSampling,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            drilldown_limit: 10,
            sampling: DrilldownSampling::Random,
        }
    }
}

/// The view shown at startup.
pub fn initial_view(ctx: &DashboardContext, options: &ViewOptions) -> (ViewState, ViewPayload) {
    let state = ViewState::Aggregate;
    let payload = render_view(ctx, &state, options);
    (state, payload)
}

/// Apply one interaction to the current view.
///
/// This is the whole controller: no state lives outside the arguments, so
/// any front end (terminal, HTTP, tests) can host it.
///
/// | current       | interaction          | next          |
/// |---------------|----------------------|---------------|
/// | Aggregate     | SelectCategory(known)| Drilldown(C)  |
/// | Aggregate     | SelectCategory(unknown) | Aggregate  |
/// | Aggregate     | Back                 | Aggregate     |
/// | Drilldown(C)  | Back                 | Aggregate     |
/// | Drilldown(C)  | SelectCategory(_)    | Drilldown(C)  |
///
/// The drilldown view offers no categories to select, so a selection there
/// is ignored and the current view is re-derived.
pub fn compute_view(
    ctx: &DashboardContext,
    current: &ViewState,
    interaction: Interaction,
    options: &ViewOptions,
) -> (ViewState, ViewPayload) {
    let next = match (current, interaction) {
        (ViewState::Aggregate, Interaction::SelectCategory(category)) => {
            if ctx.index().get(&category).is_some() {
                ViewState::Drilldown(category)
            } else {
                tracing::warn!(category = %category, "Selected category is not in the index");
                ViewState::Aggregate
            }
        }
        (ViewState::Drilldown(category), Interaction::SelectCategory(selected)) => {
            tracing::debug!(current = %category, selected = %selected, "Ignoring selection inside drilldown");
            ViewState::Drilldown(category.clone())
        }
        (_, Interaction::Back) => ViewState::Aggregate,
    };

    let payload = render_view(ctx, &next, options);
    (next, payload)
}

/// Derive the payload for a view from the context alone.
pub fn render_view(ctx: &DashboardContext, state: &ViewState, options: &ViewOptions) -> ViewPayload {
    match state {
        ViewState::Aggregate => aggregate_payload(ctx),
        ViewState::Drilldown(category) => drilldown_payload(ctx, category, options),
    }
}

fn aggregate_payload(ctx: &DashboardContext) -> ViewPayload {
    let index = ctx.index();
    let points = index
        .iter()
        .map(|(category, bucket)| BubblePoint {
            label: category.to_string(),
            size: bucket.len(),
        })
        .collect();

    ViewPayload {
        title: format!(
            "Games by genre ({} games, {} genres)",
            ctx.entries().len(),
            index.len()
        ),
        points,
        show_back: false,
        cards: Vec::new(),
    }
}

fn drilldown_payload(ctx: &DashboardContext, category: &str, options: &ViewOptions) -> ViewPayload {
    let bucket = ctx.index().get(category).unwrap_or_default();
    let sample = sample_bucket(bucket, options.drilldown_limit, category, options.sampling);

    let cards: Vec<EntryCard> = sample
        .iter()
        .map(|entry| EntryCard {
            id: entry.id(),
            name: entry.name().to_string(),
            image_ref: entry.image_ref().to_string(),
            description: entry.description().to_string(),
            store_url: ctx.store_page_url(entry.id()),
        })
        .collect();

    let points = cards
        .iter()
        .map(|card| BubblePoint {
            label: card.name.clone(),
            size: 1,
        })
        .collect();

    ViewPayload {
        title: format!("{}: {} of {} games", category, cards.len(), bucket.len()),
        points,
        show_back: true,
        cards,
    }
}
