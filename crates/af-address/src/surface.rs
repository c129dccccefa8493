//! In-memory model of the address search page.
//!
//! Every element is optional. The controller checks for an element before
//! touching it, so a surface missing some of them simply does less.

use std::fmt::Write as _;

use derive_builder::Builder;

use crate::constants::{LOCATION_LABEL, SEARCH_LABEL};

pub const SEARCH_ICON: &str = "search";
pub const LOADER_ICON: &str = "loader";
pub const LOCATION_ICON: &str = "map-pin";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
}

/// An icon placeholder. `glyph` stays empty until an icon renderer fills it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Icon {
    pub name: String,
    pub glyph: Option<String>,
}

impl Icon {
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            glyph: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub icon: Option<Icon>,
    pub disabled: bool,
}

impl Button {
    pub fn new(label: &str, icon: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: Some(Icon::placeholder(icon)),
            disabled: false,
        }
    }

    /// Swap the label and icon. The new icon is an unrendered placeholder.
    pub fn set_content(&mut self, label: &str, icon: &str) {
        self.label = label.to_string();
        self.icon = Some(Icon::placeholder(icon));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Panel {
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoRegion {
    pub rows: Vec<InfoRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailsPanel {
    pub visible: bool,
    pub info: Option<InfoRegion>,
}

pub type BannerId = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BannerContainer {
    pub banners: Vec<Banner>,
    next_id: BannerId,
}

#[derive(Builder, Clone, Debug, Default)]
#[builder(default, setter(strip_option))]
pub struct Surface {
    pub input: Option<InputField>,
    pub search_button: Option<Button>,
    pub location_button: Option<Button>,
    pub suggestions: Option<Panel>,
    pub details: Option<DetailsPanel>,
    pub container: Option<BannerContainer>,
}

impl Surface {
    /// A surface with every element present and both buttons idle.
    pub fn standard() -> Self {
        Self {
            input: Some(InputField::default()),
            search_button: Some(Button::new(SEARCH_LABEL, SEARCH_ICON)),
            location_button: Some(Button::new(LOCATION_LABEL, LOCATION_ICON)),
            suggestions: Some(Panel::default()),
            details: Some(DetailsPanel {
                visible: false,
                info: Some(InfoRegion::default()),
            }),
            container: Some(BannerContainer::default()),
        }
    }

    pub fn input_value(&self) -> Option<&str> {
        self.input.as_ref().map(|input| input.value.as_str())
    }

    pub fn set_input_value(&mut self, value: impl Into<String>) {
        if let Some(input) = &mut self.input {
            input.value = value.into();
        }
    }

    /// Fill the info region and reveal the details panel. Does nothing
    /// when the info region is missing.
    pub fn show_details<L: Into<String>>(&mut self, rows: Vec<(L, String)>) {
        let Some(details) = &mut self.details else {
            return;
        };
        let Some(info) = &mut details.info else {
            return;
        };
        info.rows = rows
            .into_iter()
            .map(|(label, value)| InfoRow {
                label: label.into(),
                value,
            })
            .collect();
        details.visible = true;
    }

    pub fn hide_details(&mut self) {
        if let Some(details) = &mut self.details {
            details.visible = false;
        }
    }

    pub fn hide_suggestions(&mut self) {
        if let Some(suggestions) = &mut self.suggestions {
            suggestions.visible = false;
        }
    }

    /// Append an error banner. Returns `None` when there is no container
    /// to put it in.
    pub fn push_banner(&mut self, message: impl Into<String>) -> Option<BannerId> {
        let container = self.container.as_mut()?;
        let id = container.next_id;
        container.next_id += 1;
        container.banners.push(Banner {
            id,
            message: message.into(),
        });
        Some(id)
    }

    pub fn remove_banner(&mut self, id: BannerId) {
        if let Some(container) = &mut self.container {
            container.banners.retain(|banner| banner.id != id);
        }
    }

    pub fn banners(&self) -> &[Banner] {
        self.container
            .as_ref()
            .map(|container| container.banners.as_slice())
            .unwrap_or_default()
    }

    /// Both trigger buttons, when both are present.
    pub fn trigger_buttons_mut(&mut self) -> Option<(&mut Button, &mut Button)> {
        match (&mut self.search_button, &mut self.location_button) {
            (Some(search), Some(location)) => Some((search, location)),
            _ => None,
        }
    }

    pub fn icons_mut(&mut self) -> impl Iterator<Item = &mut Icon> {
        [&mut self.search_button, &mut self.location_button]
            .into_iter()
            .filter_map(|button| button.as_mut().and_then(|button| button.icon.as_mut()))
    }

    /// Plain-text rendering for terminal front ends.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(value) = self.input_value() {
            let _ = writeln!(out, "Local: {value}");
        }
        for button in [&self.search_button, &self.location_button].into_iter().flatten() {
            let glyph = button
                .icon
                .as_ref()
                .and_then(|icon| icon.glyph.as_deref())
                .unwrap_or("");
            let state = if button.disabled { " (desativado)" } else { "" };
            let _ = writeln!(out, "[{glyph} {}]{state}", button.label);
        }
        if let Some(DetailsPanel {
            visible: true,
            info: Some(info),
        }) = &self.details
        {
            for row in &info.rows {
                let _ = writeln!(out, "  {}: {}", row.label, row.value);
            }
        }
        for banner in self.banners() {
            let _ = writeln!(out, "Erro: {}", banner.message);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_details_reveals_panel() {
        let mut surface = Surface::standard();

        surface.show_details(vec![("CEP", "01234-567".to_string())]);

        let details = surface.details.as_ref().unwrap();
        assert!(details.visible);
        assert_eq!(
            details.info.as_ref().unwrap().rows,
            vec![InfoRow {
                label: "CEP".to_string(),
                value: "01234-567".to_string()
            }]
        );
        assert!(surface.render().contains("  CEP: 01234-567"));
    }

    #[test]
    fn show_details_without_info_region_keeps_panel_hidden() {
        let mut surface = SurfaceBuilder::default()
            .details(DetailsPanel::default())
            .build()
            .unwrap();

        surface.show_details(vec![("CEP", "01234-567".to_string())]);

        assert!(!surface.details.unwrap().visible);
    }

    #[test]
    fn missing_elements_are_ignored() {
        let mut surface = SurfaceBuilder::default().build().unwrap();

        surface.set_input_value("01234-567");
        surface.hide_details();
        surface.hide_suggestions();

        assert_eq!(surface.input_value(), None);
        assert_eq!(surface.push_banner("Erro"), None);
        assert!(surface.banners().is_empty());
        assert!(surface.trigger_buttons_mut().is_none());
        assert_eq!(surface.render(), "");
    }

    #[test]
    fn banners_are_removed_by_id() {
        let mut surface = Surface::standard();
        let first = surface.push_banner("primeiro").unwrap();
        let second = surface.push_banner("segundo").unwrap();

        surface.remove_banner(first);

        assert_eq!(
            surface.banners(),
            &[Banner {
                id: second,
                message: "segundo".to_string()
            }]
        );
    }
}
