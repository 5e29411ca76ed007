use crate::dashboard::{
    compute_view, initial_view, EntryCard, Interaction, ViewOptions, ViewPayload, ViewState,
};
use crate::keybindings::{Context, KeybindingRegistry};
use crate::pipeline::DashboardContext;
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Application State
// ============================================================================

/// Central application state for the terminal dashboard.
///
/// The shared [`DashboardContext`] is read-only; everything here is the
/// per-session view state layered on top of it.
pub struct App {
    ctx: Arc<DashboardContext>,
    options: ViewOptions,

    /// The view being shown and its derived payload.
    pub view_state: ViewState,
    pub payload: ViewPayload,

    /// Selected bubble (aggregate) or card (drilldown) index.
    pub selected: usize,
    /// Bubble selection to restore when leaving a drilldown.
    aggregate_selected: usize,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    /// Status message with expiry. Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(
        ctx: Arc<DashboardContext>,
        options: ViewOptions,
        theme_variant: ThemeVariant,
        keybindings: KeybindingRegistry,
    ) -> Self {
        let (view_state, payload) = initial_view(&ctx, &options);

        Self {
            ctx,
            options,
            view_state,
            payload,
            selected: 0,
            aggregate_selected: 0,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    pub fn context(&self) -> &DashboardContext {
        &self.ctx
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns the new theme's name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Keybinding context for the current view.
    pub fn key_context(&self) -> Context {
        match self.view_state {
            ViewState::Aggregate => Context::Aggregate,
            ViewState::Drilldown(_) => Context::Drilldown,
        }
    }

    pub fn in_drilldown(&self) -> bool {
        matches!(self.view_state, ViewState::Drilldown(_))
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn nav_next(&mut self) {
        if !self.payload.points.is_empty() {
            let max_index = self.payload.points.len().saturating_sub(1);
            self.selected = self.selected.saturating_add(1).min(max_index);
        }
    }

    pub fn nav_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Label of the selected bubble, if any.
    pub fn selected_label(&self) -> Option<&str> {
        self.payload
            .points
            .get(self.selected)
            .map(|p| p.label.as_str())
    }

    /// The selected entry card; only drilldowns carry cards.
    pub fn selected_card(&self) -> Option<&EntryCard> {
        self.payload.cards.get(self.selected)
    }

    // ------------------------------------------------------------------------
    // View transitions
    // ------------------------------------------------------------------------

    /// Drill into the selected bubble's category.
    pub fn select_current(&mut self) {
        let Some(label) = self.selected_label().map(str::to_string) else {
            self.set_status("Nothing to select");
            return;
        };
        self.apply(Interaction::SelectCategory(label));
    }

    pub fn back(&mut self) {
        self.apply(Interaction::Back);
    }

    /// Run an interaction through the dashboard controller and adopt the
    /// resulting view.
    pub fn apply(&mut self, interaction: Interaction) {
        let was_drilldown = self.in_drilldown();
        if !was_drilldown {
            self.aggregate_selected = self.selected;
        }

        let (state, payload) =
            compute_view(&self.ctx, &self.view_state, interaction, &self.options);

        self.selected = match (&state, was_drilldown) {
            (ViewState::Drilldown(_), false) => 0,
            (ViewState::Aggregate, true) => self.aggregate_selected,
            _ => self.selected,
        };
        self.view_state = state;
        self.payload = payload;
        self.clamp_selection();
        self.needs_redraw = true;
    }

    /// Clamp the selection index to the current payload.
    pub fn clamp_selection(&mut self) {
        self.selected = if self.payload.points.is_empty() {
            0
        } else {
            self.selected.min(self.payload.points.len() - 1)
        };
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
