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

use serde::{Deserialize, Serialize};

/// A font loaded by the host renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescriptor {
    /// Name of the font as found in the document.
    pub name: String,
    /// Name under which the renderer registered the font. Text spans carry it
    /// as their font-name attribute.
    pub loaded_name: String,
    /// Font program type, e.g. `TrueType` or `Type1`.
    #[serde(rename = "type", default)]
    pub font_type: String,
    /// MIME type of `data`.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// The font program, when the renderer exposes it.
    #[serde(default)]
    pub data: Option<Vec<u8>>,
}

impl FontDescriptor {
    /// Creates a descriptor without embedded data.
    pub fn new(
        name: impl Into<String>,
        loaded_name: impl Into<String>,
        font_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            loaded_name: loaded_name.into(),
            font_type: font_type.into(),
            mime_type: None,
            data: None,
        }
    }

    /// Attaches the font program.
    pub fn with_data(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.mime_type = Some(mime_type.into());
        self.data = Some(data);
        self
    }

    /// File extension matching the MIME type of the embedded data.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_deref() {
            Some("font/opentype" | "font/otf") => "otf",
            Some("font/ttf" | "font/truetype" | "application/x-font-ttf") => "ttf",
            Some("font/woff") => "woff",
            Some("font/woff2") => "woff2",
            Some("font/type1" | "application/x-font-type1") => "pfb",
            _ => "bin",
        }
    }
}
