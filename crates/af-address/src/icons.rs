use crate::surface::Surface;

/// Turns icon placeholders into something displayable. Invoked after every
/// surface update that introduces new placeholders.
pub trait IconRenderer: Send + Sync + 'static {
    fn replace(&self, surface: &mut Surface);
}

/// Renders icons as terminal glyphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlyphIcons;

impl GlyphIcons {
    fn glyph(name: &str) -> &'static str {
        match name {
            "search" => "🔍",
            "loader" => "⏳",
            "map-pin" => "📍",
            _ => "•",
        }
    }
}

impl IconRenderer for GlyphIcons {
    fn replace(&self, surface: &mut Surface) {
        for icon in surface.icons_mut().filter(|icon| icon.glyph.is_none()) {
            icon.glyph = Some(Self::glyph(&icon.name).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::LOADER_ICON;

    #[test]
    fn replace_fills_placeholders() {
        let mut surface = Surface::standard();

        GlyphIcons.replace(&mut surface);

        let glyphs: Vec<_> = surface
            .icons_mut()
            .map(|icon| icon.glyph.clone())
            .collect();
        assert_eq!(glyphs, vec![Some("🔍".to_string()), Some("📍".to_string())]);
    }

    #[test]
    fn replace_only_touches_new_placeholders() {
        let mut surface = Surface::standard();
        GlyphIcons.replace(&mut surface);
        if let Some(button) = &mut surface.search_button {
            button.set_content("Buscando...", LOADER_ICON);
        }

        GlyphIcons.replace(&mut surface);

        let search_icon = surface.search_button.unwrap().icon.unwrap();
        assert_eq!(search_icon.glyph.as_deref(), Some("⏳"));
    }
}
