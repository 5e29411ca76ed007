//! Right-hand panel: genre summary on the aggregate view, game cards in a
//! drilldown.

use crate::app::App;
use crate::util::{clean_text, display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Lines of description shown per card.
const DESCRIPTION_LINES: usize = 2;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    if app.in_drilldown() {
        render_cards(f, app, area);
    } else {
        render_summary(f, app, area);
    }
}

/// Summary of the selected genre and of the run that produced the dashboard.
fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let ctx = app.context();
    let meta = app.style("card_meta");

    let mut lines = Vec::new();
    if let Some(point) = app.payload.points.get(app.selected) {
        let share = if ctx.entries().is_empty() {
            0.0
        } else {
            point.size as f64 * 100.0 / ctx.entries().len() as f64
        };
        lines.push(Line::from(Span::styled(
            clean_text(&point.label),
            app.style("card_title"),
        )));
        lines.push(Line::from(format!(
            "{} games ({:.0}% of the sample)",
            point.size, share
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Enter to see its games", meta)));
    } else {
        lines.push(Line::from("No genres to show."));
        lines.push(Line::from(Span::styled(
            "Every detail lookup came back empty.",
            meta,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Catalog entries:  {}", ctx.catalog_size()),
        meta,
    )));
    lines.push(Line::from(Span::styled(
        format!("Lookups made:     {}", ctx.attempted()),
        meta,
    )));
    lines.push(Line::from(Span::styled(
        format!("Games enriched:   {}", ctx.entries().len()),
        meta,
    )));
    lines.push(Line::from(Span::styled(
        format!("Genres:           {}", ctx.index().len()),
        meta,
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Genre "),
        )
        .style(app.style("card_body"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// One list item per sampled game: name, description, image, store link.
fn render_cards(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let title_style = app.style("card_title");
    let body_style = app.style("card_body");
    let meta = app.style("card_meta");

    let items: Vec<ListItem> = app
        .payload
        .cards
        .iter()
        .map(|card| {
            let name = clean_text(&card.name);
            let mut lines = vec![Line::from(Span::styled(
                truncate_to_width(&name, width).into_owned(),
                title_style,
            ))];

            let description = clean_text(&card.description);
            for chunk in wrap_words(&description, width).into_iter().take(DESCRIPTION_LINES) {
                lines.push(Line::from(Span::styled(chunk, body_style)));
            }
            if !card.image_ref.is_empty() {
                lines.push(Line::from(Span::styled(
                    truncate_to_width(&card.image_ref, width).into_owned(),
                    meta,
                )));
            }
            lines.push(Line::from(Span::styled(
                truncate_to_width(&card.store_url, width).into_owned(),
                meta,
            )));
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(format!(" Games ({}) ", app.payload.cards.len())),
        )
        .highlight_style(app.style("card_selected"))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.payload.cards.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Greedy word wrap to `width` columns. Words wider than a line are
/// truncated rather than split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = truncate_to_width(word, width);
        let needed = if current.is_empty() {
            display_width(&word)
        } else {
            display_width(&current) + 1 + display_width(&word)
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_words() {
        assert_eq!(
            wrap_words("a quick brown fox jumps", 10),
            vec!["a quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_long_word_truncated() {
        assert_eq!(wrap_words("supercalifragilistic ok", 8), vec!["super...", "ok"]);
    }

    #[test]
    fn test_wrap_degenerate() {
        assert!(wrap_words("", 10).is_empty());
        assert!(wrap_words("words", 0).is_empty());
    }
}
