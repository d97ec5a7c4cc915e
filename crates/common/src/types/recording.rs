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

//! Recorded documents
//!
//! A recording is what the host renderer hands to the debugger outside of a
//! live session: the operator list of every page in the renderer's native
//! `{ fnArray, argsArray }` form, the fonts it loaded and, optionally, its
//! operator enumeration.
//!
//! ```json
//! {
//!   "ops": { "save": 10, "restore": 11, "showText": 44 },
//!   "fonts": [{ "font": { "name": "Helvetica", "loadedName": "g_f1", "type": "Type1" } }],
//!   "pages": [{ "fnArray": [10, 44, 11], "argsArray": [null, [[{"unicode": "a"}]], null] }]
//! }
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    types::{FontDescriptor, OperatorList},
    OpcodeTable,
};

/// A font entry of a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedFont {
    /// The font as described by the renderer.
    pub font: FontDescriptor,
    /// The CSS `src` the renderer used for the font face, if any.
    #[serde(default)]
    pub css: Option<String>,
}

/// The operator list of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPage {
    /// Raw opcodes.
    pub fn_array: Vec<u32>,
    /// Arguments, parallel to `fn_array`.
    #[serde(default)]
    pub args_array: Vec<Option<Vec<Value>>>,
    /// Fonts first used on this page.
    #[serde(default)]
    pub fonts: Vec<RecordedFont>,
}

impl RecordedPage {
    /// The page's operator list.
    pub fn operator_list(&self) -> OperatorList {
        OperatorList::from_raw(&self.fn_array, &self.args_array)
    }
}

/// A whole recorded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedDocument {
    /// The renderer's `name -> code` enumeration. The standard one is used when absent.
    #[serde(default)]
    pub ops: Option<BTreeMap<String, u32>>,
    /// Fonts loaded before any page rendered.
    #[serde(default)]
    pub fonts: Vec<RecordedFont>,
    /// Pages in document order.
    #[serde(default)]
    pub pages: Vec<RecordedPage>,
}

impl RecordedDocument {
    /// Loads a recording from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse recording: {}", path.display()))
    }

    /// Opcode table for this recording.
    pub fn opcode_table(&self) -> OpcodeTable {
        match &self.ops {
            Some(ops) => OpcodeTable::resolve(ops.iter().map(|(name, code)| (name.clone(), *code))),
            None => OpcodeTable::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r#"{
        "fonts": [{ "font": { "name": "Helvetica", "loadedName": "g_f1", "type": "Type1" },
                    "css": "url(\"blob:abc\")" }],
        "pages": [{ "fnArray": [10, 44, 11], "argsArray": [null, [[{"unicode": "a"}]], null] }]
    }"#;

    #[test]
    fn test_parse_recording() {
        let doc: RecordedDocument = serde_json::from_str(RECORDING).unwrap();

        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.fonts[0].font.loaded_name, "g_f1");

        let list = doc.pages[0].operator_list();
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(1).unwrap().opcode, 44);
        assert!(list.get(2).unwrap().args.is_empty());
    }

    #[test]
    fn test_opcode_table_prefers_recorded_enumeration() {
        let mut doc: RecordedDocument = serde_json::from_str(RECORDING).unwrap();
        assert_eq!(doc.opcode_table().name_of(44), Some("showText"));

        doc.ops = Some(BTreeMap::from([("custom".to_string(), 44)]));
        assert_eq!(doc.opcode_table().name_of(44), Some("custom"));
        assert_eq!(doc.opcode_table().name_of(10), None);
    }
}
