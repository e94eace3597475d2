//! Tray menu model
//!
//! The menu is a fixed sequence; it is rebuilt from the catalog every time
//! a new native handle is constructed, never mutated in place.

use super::catalog::StringCatalog;
use super::listener::TrayAction;
use crate::error::{Error, Result};

/// Catalog keys for the four actionable entries, in menu order.
pub const MENU_KEYS: [(&str, TrayAction); 4] = [
    ("Display", TrayAction::ShowHide),
    ("Settings", TrayAction::Settings),
    ("About", TrayAction::About),
    ("Exit", TrayAction::Exit),
];

/// One entry of the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Actionable item bound to exactly one listener callback.
    Action { action: TrayAction, label: String },
    /// Visual separator.
    Separator,
}

/// Ordered tray menu: {Display} | {Settings, About} | {Exit}.
#[derive(Debug, Clone)]
pub struct MenuModel {
    pub entries: Vec<MenuEntry>,
}

impl MenuModel {
    /// Build the fixed menu with labels resolved through `catalog`.
    ///
    /// Fails if any required key is absent; the controller validates the
    /// catalog once at construction via [`validate_labels`], so rebuilds
    /// during `show` cannot fail.
    pub fn build(catalog: &StringCatalog) -> Result<Self> {
        let label = |key: &str| -> Result<String> {
            catalog
                .lookup(key)
                .map(str::to_owned)
                .ok_or_else(|| Error::MissingLabel(key.to_owned()))
        };

        let entries = vec![
            MenuEntry::Action {
                action: TrayAction::ShowHide,
                label: label("Display")?,
            },
            MenuEntry::Separator,
            MenuEntry::Action {
                action: TrayAction::Settings,
                label: label("Settings")?,
            },
            MenuEntry::Action {
                action: TrayAction::About,
                label: label("About")?,
            },
            MenuEntry::Separator,
            MenuEntry::Action {
                action: TrayAction::Exit,
                label: label("Exit")?,
            },
        ];
        Ok(Self { entries })
    }

    /// Actionable entries in order, skipping separators.
    pub fn actions(&self) -> impl Iterator<Item = (&TrayAction, &str)> {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Action { action, label } => Some((action, label.as_str())),
            MenuEntry::Separator => None,
        })
    }
}

/// Check that `catalog` resolves every key the menu requires.
pub fn validate_labels(catalog: &StringCatalog) -> Result<()> {
    for (key, _) in MENU_KEYS {
        if catalog.lookup(key).is_none() {
            return Err(Error::MissingLabel(key.to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order_and_grouping() {
        let catalog = StringCatalog::builtin();
        let menu = MenuModel::build(&catalog).unwrap();

        let shape: Vec<Option<TrayAction>> = menu
            .entries
            .iter()
            .map(|e| match e {
                MenuEntry::Action { action, .. } => Some(*action),
                MenuEntry::Separator => None,
            })
            .collect();

        assert_eq!(
            shape,
            vec![
                Some(TrayAction::ShowHide),
                None,
                Some(TrayAction::Settings),
                Some(TrayAction::About),
                None,
                Some(TrayAction::Exit),
            ]
        );
    }

    #[test]
    fn test_labels_come_from_catalog() {
        let catalog = StringCatalog::from_toml_str(
            r#"
            Display = "Anzeigen"
            Settings = "Einstellungen"
            About = "Info"
            Exit = "Beenden"
            "#,
        )
        .unwrap();
        let menu = MenuModel::build(&catalog).unwrap();
        let labels: Vec<&str> = menu.actions().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["Anzeigen", "Einstellungen", "Info", "Beenden"]);
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let catalog = StringCatalog::from_toml_str(r#"Display = "Show""#).unwrap();
        let err = validate_labels(&catalog).unwrap_err();
        assert!(matches!(err, Error::MissingLabel(ref k) if k == "Settings"));
    }
}
