//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry for the current view,
//! then dispatched to `App` methods that drive the dashboard controller.

use crate::app::App;
use crate::keybindings::Action as KbAction;
use crate::util::validate_url_for_open;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    let context = app.key_context();
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavNext => app.nav_next(),
        KbAction::NavPrev => app.nav_prev(),
        KbAction::Select => app.select_current(),
        KbAction::Back => app.back(),
        KbAction::OpenInBrowser => open_selected_card(app),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
    }

    Action::Continue
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Open the selected game's store page in the system browser.
fn open_selected_card(app: &mut App) {
    let Some(card) = app.selected_card() else {
        app.set_status("No game selected");
        return;
    };
    let url = card.store_url.clone();
    let name = card.name.clone();

    // Validate before open::that(), which hands the string to the platform launcher
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e),
        Ok(_) => match open::that(&url) {
            Ok(()) => app.set_status(format!("Opening {}...", name)),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::dashboard::ViewState;
    use crate::theme::ThemeVariant;

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Quit));
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL),
            Action::Quit
        ));
    }

    #[test]
    fn test_enter_drills_and_esc_returns() {
        let mut app = test_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view_state, ViewState::Drilldown("Indie".into()));

        // Enter has no meaning inside a drilldown
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view_state, ViewState::Drilldown("Indie".into()));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view_state, ViewState::Aggregate);
        assert_eq!(app.selected_label(), Some("Indie"));
    }

    #[test]
    fn test_esc_on_aggregate_is_noop() {
        let mut app = test_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view_state, ViewState::Aggregate);
    }

    #[test]
    fn test_open_without_card_sets_status() {
        let mut app = test_app();
        // 'o' is only bound in drilldowns; in the aggregate view it does nothing.
        press(&mut app, KeyCode::Char('o'));
        assert!(app.status_message.is_none());
        open_selected_card(&mut app);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_theme_cycle_sets_status() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(&**msg, "Theme: Light");
    }

    #[test]
    fn test_help_captures_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        // q closes help instead of quitting
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Continue));
        assert!(!app.show_help);
    }

    #[test]
    fn test_help_scroll() {
        let mut app = test_app();
        app.show_help = true;
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.help_scroll_offset, 1);
    }
}
