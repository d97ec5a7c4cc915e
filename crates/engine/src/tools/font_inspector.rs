// PDFBug - Operator List Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Font inspector.
//!
//! Lists every font the renderer loads and lets the user single out the text
//! drawn with a given font: checking a font shows its text spans, unchecking
//! hides them, and text of untouched fonts stays plain.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use pdfbug_common::types::FontDescriptor;
use regex::Regex;
use tracing::{debug, info};

use super::{DebugTool, ToolId};
use crate::{DebuggerContext, DebuggerError};

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(['"]?([^)"']+)"#).expect("CSS url pattern is valid")
});

/// Where the program of a font can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// The url of the font face's CSS source.
    Url(String),
    /// The font program is embedded in the descriptor.
    Embedded {
        /// MIME type of the program, if known.
        mime_type: Option<String>,
        /// Size of the program in bytes.
        len: usize,
    },
    /// Nothing to download.
    Unavailable,
}

impl FontSource {
    /// Picks the download source of a font: the CSS url first, then the embedded data.
    pub fn detect(descriptor: &FontDescriptor, css: Option<&str>) -> Self {
        if let Some(url) = css.and_then(|css| CSS_URL.captures(css)).and_then(|c| c.get(1)) {
            return Self::Url(url.as_str().to_string());
        }
        match &descriptor.data {
            Some(data) => Self::Embedded { mime_type: descriptor.mime_type.clone(), len: data.len() },
            None => Self::Unavailable,
        }
    }
}

/// A font listed by the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    /// The font as described by the renderer.
    pub descriptor: FontDescriptor,
    /// Download source.
    pub source: FontSource,
    /// Whether the font's checkbox is checked.
    pub selected: bool,
}

/// How a text span should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanHighlight {
    /// No font filtering applies.
    Plain,
    /// The span's font was unchecked.
    Hidden,
    /// The span's font was checked.
    Shown,
}

/// The font inspector tool.
#[derive(Debug, Default)]
pub struct FontInspector {
    fonts: Vec<FontEntry>,
    // loaded name -> shown
    span_state: HashMap<String, bool>,
    // Spans of fonts without an explicit choice are hidden.
    hide_unselected: bool,
    active: bool,
}

impl FontInspector {
    /// Creates an empty inspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a font loaded by the renderer. `css` is the font face's CSS source.
    pub fn font_added(&mut self, descriptor: FontDescriptor, css: Option<&str>) {
        let source = FontSource::detect(&descriptor, css);
        debug!("Font added: {} ({}) {:?}", descriptor.name, descriptor.loaded_name, source);
        self.fonts.push(FontEntry { descriptor, source, selected: false });
    }

    /// Fonts in load order.
    pub fn fonts(&self) -> &[FontEntry] {
        &self.fonts
    }

    /// Looks a font up by its loaded name, then by its document name.
    pub fn font(&self, name: &str) -> Option<&FontEntry> {
        self.fonts
            .iter()
            .find(|f| f.descriptor.loaded_name == name)
            .or_else(|| self.fonts.iter().find(|f| f.descriptor.name == name))
    }

    /// Checks or unchecks the font registered as `loaded_name`.
    pub fn select_font(&mut self, loaded_name: &str, show: bool) {
        for entry in self.fonts.iter_mut().filter(|f| f.descriptor.loaded_name == loaded_name) {
            entry.selected = show;
        }
        self.span_state.insert(loaded_name.to_string(), show);
    }

    /// A click on a text span drawn with `font_name` toggles that font.
    ///
    /// Ignored while the inspector is inactive.
    pub fn text_layer_click(&mut self, font_name: &str) {
        if !self.active {
            return;
        }
        let toggled: Vec<bool> = self
            .fonts
            .iter_mut()
            .filter(|f| f.descriptor.loaded_name == font_name)
            .map(|f| {
                f.selected = !f.selected;
                f.selected
            })
            .collect();
        if let Some(&show) = toggled.last() {
            self.span_state.insert(font_name.to_string(), show);
        }
    }

    /// Unchecks every font and hides the text of all of them.
    pub fn reset_selection(&mut self) {
        self.clear_selection();
        self.hide_unselected = true;
    }

    // Unchecks every font and draws all spans plain again.
    fn remove_selection(&mut self) {
        self.clear_selection();
        self.hide_unselected = false;
    }

    fn clear_selection(&mut self) {
        self.span_state.clear();
        for entry in &mut self.fonts {
            entry.selected = false;
        }
    }

    /// How spans drawn with `font_name` should look.
    pub fn span_highlight(&self, font_name: &str) -> SpanHighlight {
        if !self.active {
            return SpanHighlight::Plain;
        }
        match self.span_state.get(font_name) {
            None if self.hide_unselected => SpanHighlight::Hidden,
            None => SpanHighlight::Plain,
            Some(true) => SpanHighlight::Shown,
            Some(false) => SpanHighlight::Hidden,
        }
    }

    /// Writes the embedded program of font `name` to `<dir>/<loaded name>.<ext>`.
    ///
    /// Loaded names are unique per document, unlike font names.
    pub fn export_font(&self, name: &str, dir: &Path) -> Result<PathBuf, DebuggerError> {
        let entry = self.font(name).ok_or_else(|| DebuggerError::FontUnavailable(name.to_string()))?;
        let data = entry
            .descriptor
            .data
            .as_deref()
            .ok_or_else(|| DebuggerError::FontUnavailable(name.to_string()))?;

        let file_name: String = entry
            .descriptor
            .loaded_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        let path = dir.join(format!("{}.{}", file_name, entry.descriptor.file_extension()));
        fs::create_dir_all(dir)?;
        fs::write(&path, data)?;
        info!("Exported font {} to {}", entry.descriptor.name, path.display());
        Ok(path)
    }

    /// Whether the inspector panel is active.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl DebugTool for FontInspector {
    fn id(&self) -> ToolId {
        ToolId::FontInspector
    }

    fn init(&mut self, _ctx: &DebuggerContext) {}

    fn cleanup(&mut self) {
        self.fonts.clear();
        self.span_state.clear();
        self.hide_unselected = false;
    }

    fn activate(&mut self, active: bool) {
        self.active = active;
        if active {
            self.reset_selection();
        } else {
            self.remove_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica() -> FontDescriptor {
        FontDescriptor::new("Helvetica", "g_f1", "Type1")
    }

    #[test]
    fn test_source_from_css_url() {
        let font = helvetica();
        assert_eq!(
            FontSource::detect(&font, Some(r#"url("blob:http://host/1234")"#)),
            FontSource::Url("blob:http://host/1234".to_string())
        );
        assert_eq!(
            FontSource::detect(&font, Some("url(fonts/a.ttf) format('truetype')")),
            FontSource::Url("fonts/a.ttf".to_string())
        );
    }

    #[test]
    fn test_source_falls_back_to_data() {
        let font = helvetica().with_data("font/opentype", vec![1, 2, 3]);
        assert_eq!(
            FontSource::detect(&font, Some("local(Helvetica)")),
            FontSource::Embedded { mime_type: Some("font/opentype".to_string()), len: 3 }
        );
        assert_eq!(FontSource::detect(&helvetica(), None), FontSource::Unavailable);
    }

    #[test]
    fn test_span_highlight_follows_selection() {
        let mut inspector = FontInspector::new();
        inspector.font_added(helvetica(), None);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Plain);

        inspector.activate(true);
        inspector.select_font("g_f1", false);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Hidden);

        inspector.text_layer_click("g_f1");
        assert!(inspector.fonts()[0].selected);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Shown);
        assert_eq!(inspector.span_highlight("g_f2"), SpanHighlight::Hidden);

        inspector.activate(false);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Plain);
        assert!(!inspector.fonts()[0].selected);
    }

    #[test]
    fn test_activation_hides_unchecked_fonts() {
        let mut inspector = FontInspector::new();
        inspector.font_added(helvetica(), None);
        inspector.font_added(FontDescriptor::new("Times", "g_f2", "TrueType"), None);

        inspector.activate(true);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Hidden);
        assert_eq!(inspector.span_highlight("g_f2"), SpanHighlight::Hidden);

        inspector.select_font("g_f1", true);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Shown);

        inspector.reset_selection();
        assert!(!inspector.fonts()[0].selected);
        assert_eq!(inspector.span_highlight("g_f1"), SpanHighlight::Hidden);
    }

    #[test]
    fn test_click_ignored_when_inactive() {
        let mut inspector = FontInspector::new();
        inspector.font_added(helvetica(), None);
        inspector.text_layer_click("g_f1");
        assert!(!inspector.fonts()[0].selected);
    }

    #[test]
    fn test_export_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut inspector = FontInspector::new();
        inspector.font_added(helvetica().with_data("font/ttf", vec![0, 1, 0, 0]), None);
        inspector.font_added(FontDescriptor::new("Times", "g_f2", "TrueType"), None);

        let path = inspector.export_font("g_f1", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("g_f1.ttf"));
        assert_eq!(fs::read(&path).unwrap(), vec![0, 1, 0, 0]);

        assert!(matches!(
            inspector.export_font("Times", dir.path()),
            Err(DebuggerError::FontUnavailable(_))
        ));
        assert!(matches!(
            inspector.export_font("Missing", dir.path()),
            Err(DebuggerError::FontUnavailable(_))
        ));
    }

    #[test]
    fn test_export_fonts_sharing_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut inspector = FontInspector::new();
        let subset = |loaded: &str, byte: u8| {
            FontDescriptor::new("ABCDEF+Arial", loaded, "TrueType").with_data("font/ttf", vec![byte])
        };
        inspector.font_added(subset("g_d0_f1", 1), None);
        inspector.font_added(subset("g_d0_f2", 2), None);

        let first = inspector.export_font("g_d0_f1", dir.path()).unwrap();
        let second = inspector.export_font("g_d0_f2", dir.path()).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read(&first).unwrap(), vec![1]);
        assert_eq!(fs::read(&second).unwrap(), vec![2]);
    }
}
