use crate::app::App;
use crate::dashboard::ViewState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match app.view_state {
            ViewState::Aggregate => {
                Cow::Borrowed("[h/l]move [Enter]drill in [t]heme [?]help [q]uit")
            }
            ViewState::Drilldown(_) => {
                Cow::Borrowed("[j/k]move [o]pen store page [Esc]back [?]help [q]uit")
            }
        }
    };

    let built = app
        .context()
        .built_at()
        .format("built %Y-%m-%d %H:%M UTC ")
        .to_string();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(built.len() as u16)])
        .split(area);

    let style = app.style("status_bar");
    f.render_widget(Paragraph::new(text).style(style), chunks[0]);
    f.render_widget(Paragraph::new(built).style(style), chunks[1]);
}
