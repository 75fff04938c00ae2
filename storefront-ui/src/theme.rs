use storefront_types::Theme;

use crate::controller::Storefront;
use crate::dom::{ElementHandle, ElementLookup};
use crate::error::{Result, StorefrontError};
use crate::storage::Storage;

impl<S: Storage, D: ElementLookup> Storefront<S, D> {
    /// Persisted theme. Unset and unrecognized values both resolve to
    /// [`Theme::Light`].
    pub fn saved_theme(&self) -> Result<Theme> {
        let stored = self.storage.get_item(&self.config.theme_key)?;
        Ok(Theme::from_stored(stored.as_deref()))
    }

    /// Persist `theme` and reflect it on the document root. Returns whether
    /// the theme was applied; failures are logged and leave the page as is.
    pub fn set_theme(&self, theme: Theme) -> bool {
        match self.try_set_theme(theme) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error setting theme: {}", e);
                false
            }
        }
    }

    fn try_set_theme(&self, theme: Theme) -> Result<()> {
        // Persist first so a storage failure never changes what is on screen.
        self.storage
            .set_item(&self.config.theme_key, theme.as_str())?;
        let root = self
            .document
            .root()
            .ok_or_else(|| StorefrontError::MissingElement("document root".to_string()))?;
        root.set_attribute(&self.config.theme_attribute, theme.as_str())
    }

    /// Flip the persisted theme. Returns the new theme, or `None` when the
    /// toggle could not be applied.
    pub fn toggle_theme(&self) -> Option<Theme> {
        let current = match self.saved_theme() {
            Ok(theme) => theme,
            Err(e) => {
                log::error!("Error toggling theme: {}", e);
                return None;
            }
        };

        let next = current.toggled();
        if !self.set_theme(next) {
            return None;
        }
        self.update_theme_icon(next);
        Some(next)
    }

    pub fn update_theme_icon(&self, theme: Theme) {
        match self.document.element_by_id(&self.config.theme_icon_id) {
            Some(icon) => icon.set_class_name(self.theme_icon_class(theme)),
            None => log::warn!("Theme icon not found"),
        }
    }

    fn theme_icon_class(&self, theme: Theme) -> &str {
        match theme {
            Theme::Dark => &self.config.dark_icon_class,
            Theme::Light => &self.config.light_icon_class,
        }
    }

    /// Page-load theme: read (falling back to the default when storage is
    /// unreadable), re-apply and sync the icon.
    pub fn apply_saved_theme(&self) -> Theme {
        let theme = self.saved_theme().unwrap_or_else(|e| {
            log::error!("Error reading saved theme, using default: {}", e);
            Theme::default()
        });
        self.set_theme(theme);
        self.update_theme_icon(theme);
        theme
    }
}
