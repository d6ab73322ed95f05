//! Context menu for the system tray.

/// Label of the quit entry. Native menu items carry no tooltip, so there is
/// no room for a longer description.
pub const QUIT_LABEL: &str = "Quit";

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// User requested to quit the application.
    Quit,
}

/// A single menu item.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
}

/// Builds the menu items. The clock has nothing to show but a way out.
pub fn build_menu() -> Vec<MenuItem> {
    vec![MenuItem {
        label: QUIT_LABEL.into(),
        enabled: true,
        action: Some(MenuAction::Quit),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_has_single_quit_item() {
        let items = build_menu();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Quit");
        assert_eq!(items[0].action, Some(MenuAction::Quit));
    }

    #[test]
    fn quit_item_is_enabled() {
        let items = build_menu();
        let quit = items.iter().find(|i| i.action == Some(MenuAction::Quit));
        assert!(quit.is_some());
        assert!(quit.unwrap().enabled);
    }
}
