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

//! Display rows of the operator log.

use serde_json::{Map, Value};

/// Rows beyond this many operations are never materialized.
pub const MAX_OPERATORS_COUNT: usize = 15_000;

/// Strings longer than this are cut in argument summaries.
pub const MAX_STRING_LENGTH: usize = 75;

/// Arrays longer than this are cut in argument summaries.
pub const MAX_ARRAY_ITEMS: usize = 10;

const ELLIPSIS: &str = "...";

/// One row of the operator log.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRow {
    /// Index of the operation in the page's operator list.
    pub index: usize,
    /// Operation name indented by the save/restore depth.
    pub label: String,
    /// Save/restore depth the row was rendered at.
    pub depth: usize,
    /// Argument column.
    pub args: RowArgs,
}

/// Argument column of an [`OperatorRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowArgs {
    /// Serialized, simplified arguments.
    Summary(String),
    /// Glyph breakdown of a text-showing operation.
    Glyphs(GlyphTable),
}

impl RowArgs {
    /// Single-line text of the column.
    pub fn to_text(&self) -> String {
        match self {
            Self::Summary(text) => text.clone(),
            Self::Glyphs(table) => table.unicode_text(),
        }
    }
}

/// One entry of a text-showing operation's glyph array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphEntry {
    /// A glyph; missing fields are empty.
    Glyph {
        /// Character code in the font's encoding.
        char_code: String,
        /// Character the font maps the code to.
        font_char: String,
        /// Unicode text of the glyph.
        unicode: String,
    },
    /// A spacing adjustment. Empty for null entries.
    Advance(String),
    /// An entry of no recognized shape, rendered as an empty advance.
    Unrecognized,
}

impl GlyphEntry {
    /// Classifies one raw glyph array entry.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self::Glyph {
                char_code: field_text(fields, "originalCharCode"),
                font_char: field_text(fields, "fontChar"),
                unicode: field_text(fields, "unicode"),
            },
            Value::Number(n) => Self::Advance(n.to_string()),
            Value::Null => Self::Advance(String::new()),
            _ => Self::Unrecognized,
        }
    }

    /// Whether the entry occupies the advance column style.
    pub fn is_advance(&self) -> bool {
        !matches!(self, Self::Glyph { .. })
    }

    /// The three aligned cells: char code, font char and unicode.
    pub fn cells(&self) -> [&str; 3] {
        match self {
            Self::Glyph { char_code, font_char, unicode } => {
                [char_code.as_str(), font_char.as_str(), unicode.as_str()]
            }
            Self::Advance(advance) => [advance.as_str(), "", ""],
            Self::Unrecognized => ["", "", ""],
        }
    }
}

fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Glyph breakdown of a text-showing operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    entries: Vec<GlyphEntry>,
}

impl GlyphTable {
    /// Builds the table from the operation's first argument.
    ///
    /// A missing or non-array argument yields an empty table.
    pub fn from_arg(arg: Option<&Value>) -> Self {
        let entries = match arg {
            Some(Value::Array(glyphs)) => glyphs.iter().map(GlyphEntry::classify).collect(),
            _ => Vec::new(),
        };
        Self { entries }
    }

    /// Entries in order.
    pub fn entries(&self) -> &[GlyphEntry] {
        &self.entries
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The char code, font char and unicode rows, each with one cell per entry.
    pub fn rows(&self) -> [Vec<&str>; 3] {
        let mut rows: [Vec<&str>; 3] = Default::default();
        for entry in &self.entries {
            for (row, cell) in rows.iter_mut().zip(entry.cells()) {
                row.push(cell);
            }
        }
        rows
    }

    /// Concatenated unicode text of all glyphs.
    pub fn unicode_text(&self) -> String {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                GlyphEntry::Glyph { unicode, .. } => Some(unicode.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Shortens long strings and arrays so a row stays readable.
///
/// Applies recursively; object keys are kept as they are.
pub fn simplify_args(value: &Value) -> Value {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING_LENGTH => {
            let mut cut: String = s.chars().take(MAX_STRING_LENGTH).collect();
            cut.push_str(ELLIPSIS);
            Value::String(cut)
        }
        Value::Array(items) if items.len() > MAX_ARRAY_ITEMS => {
            let mut cut: Vec<Value> = items[..MAX_ARRAY_ITEMS].iter().map(simplify_args).collect();
            cut.push(Value::String(ELLIPSIS.to_string()));
            Value::Array(cut)
        }
        Value::Array(items) => Value::Array(items.iter().map(simplify_args).collect()),
        Value::Object(fields) => {
            Value::Object(fields.iter().map(|(k, v)| (k.clone(), simplify_args(v))).collect())
        }
        other => other.clone(),
    }
}

/// Serialized summary of an argument list.
pub fn summarize_args(args: &[Value]) -> String {
    let simplified = simplify_args(&Value::Array(args.to_vec()));
    serde_json::to_string(&simplified).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_long_string_is_cut() {
        let long = "x".repeat(200);
        let simplified = simplify_args(&json!(long));

        let expected = format!("{}...", "x".repeat(75));
        assert_eq!(simplified, json!(expected));
        assert_eq!(expected.len(), 78);
    }

    #[test]
    fn test_long_array_is_cut() {
        let items: Vec<u32> = (0..20).collect();
        let simplified = simplify_args(&json!(items));

        assert_eq!(simplified, json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, "..."]));
    }

    #[test]
    fn test_short_values_untouched() {
        let value = json!({"a": [1, 2, 3], "b": "short", "c": null});
        assert_eq!(simplify_args(&value), value);
    }

    #[test]
    fn test_nested_values_are_simplified() {
        let long = "y".repeat(80);
        let value = json!({"outer": [[long]]});

        let simplified = simplify_args(&value);
        assert_eq!(simplified["outer"][0][0], json!(format!("{}...", "y".repeat(75))));
    }

    #[test]
    fn test_summary_of_args() {
        assert_eq!(summarize_args(&[]), "[]");
        assert_eq!(summarize_args(&[json!(1), json!(0)]), "[1,0]");
    }

    #[test]
    fn test_glyph_classification() {
        let glyphs = json!([
            {"originalCharCode": 72, "fontChar": "H", "unicode": "H"},
            {"unicode": "i"},
            -250,
            null,
            "bogus",
        ]);
        let table = GlyphTable::from_arg(Some(&glyphs));

        assert_eq!(table.len(), 5);
        assert_eq!(
            table.entries()[0],
            GlyphEntry::Glyph {
                char_code: "72".to_string(),
                font_char: "H".to_string(),
                unicode: "H".to_string(),
            }
        );
        assert_eq!(table.entries()[1].cells(), ["", "", "i"]);
        assert_eq!(table.entries()[2], GlyphEntry::Advance("-250".to_string()));
        assert_eq!(table.entries()[3], GlyphEntry::Advance(String::new()));
        assert_eq!(table.entries()[4], GlyphEntry::Unrecognized);
        assert!(table.entries()[4].is_advance());

        let [codes, chars, unicode] = table.rows();
        assert_eq!(codes, vec!["72", "", "-250", "", ""]);
        assert_eq!(chars, vec!["H", "", "", "", ""]);
        assert_eq!(unicode, vec!["H", "i", "", "", ""]);
        assert_eq!(table.unicode_text(), "Hi");
    }

    #[test]
    fn test_non_array_glyph_arg_is_empty() {
        assert!(GlyphTable::from_arg(None).is_empty());
        assert!(GlyphTable::from_arg(Some(&json!("text"))).is_empty());
        assert!(GlyphTable::from_arg(Some(&json!({"unicode": "a"}))).is_empty());
    }
}
