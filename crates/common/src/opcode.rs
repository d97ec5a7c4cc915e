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

use std::{borrow::Cow, collections::HashMap};

/// Operators the stepper treats specially when building its visual log.
pub mod names {
    /// Pushes a graphics state scope.
    pub const SAVE: &str = "save";
    /// Pops a graphics state scope.
    pub const RESTORE: &str = "restore";
    /// Draws a run of glyphs.
    pub const SHOW_TEXT: &str = "showText";
}

/// The standard operator enumeration of the host renderer, as `(name, code)`.
///
/// Recordings that do not carry their own enumeration are decoded with this
/// table.
pub const BUILTIN_OPS: &[(&str, u32)] = &[
    ("dependency", 1),
    ("setLineWidth", 2),
    ("setLineCap", 3),
    ("setLineJoin", 4),
    ("setMiterLimit", 5),
    ("setDash", 6),
    ("setRenderingIntent", 7),
    ("setFlatness", 8),
    ("setGState", 9),
    ("save", 10),
    ("restore", 11),
    ("transform", 12),
    ("moveTo", 13),
    ("lineTo", 14),
    ("curveTo", 15),
    ("curveTo2", 16),
    ("curveTo3", 17),
    ("closePath", 18),
    ("rectangle", 19),
    ("stroke", 20),
    ("closeStroke", 21),
    ("fill", 22),
    ("eoFill", 23),
    ("fillStroke", 24),
    ("eoFillStroke", 25),
    ("closeFillStroke", 26),
    ("closeEOFillStroke", 27),
    ("endPath", 28),
    ("clip", 29),
    ("eoClip", 30),
    ("beginText", 31),
    ("endText", 32),
    ("setCharSpacing", 33),
    ("setWordSpacing", 34),
    ("setHScale", 35),
    ("setLeading", 36),
    ("setFont", 37),
    ("setTextRenderingMode", 38),
    ("setTextRise", 39),
    ("moveText", 40),
    ("setLeadingMoveText", 41),
    ("setTextMatrix", 42),
    ("nextLine", 43),
    ("showText", 44),
    ("showSpacedText", 45),
    ("nextLineShowText", 46),
    ("nextLineSetSpacingShowText", 47),
    ("setCharWidth", 48),
    ("setCharWidthAndBounds", 49),
    ("setStrokeColorSpace", 50),
    ("setFillColorSpace", 51),
    ("setStrokeColor", 52),
    ("setStrokeColorN", 53),
    ("setFillColor", 54),
    ("setFillColorN", 55),
    ("setStrokeGray", 56),
    ("setFillGray", 57),
    ("setStrokeRGBColor", 58),
    ("setFillRGBColor", 59),
    ("setStrokeCMYKColor", 60),
    ("setFillCMYKColor", 61),
    ("shadingFill", 62),
    ("beginInlineImage", 63),
    ("beginImageData", 64),
    ("endInlineImage", 65),
    ("paintXObject", 66),
    ("markPoint", 67),
    ("markPointProps", 68),
    ("beginMarkedContent", 69),
    ("beginMarkedContentProps", 70),
    ("endMarkedContent", 71),
    ("beginCompat", 72),
    ("endCompat", 73),
    ("paintFormXObjectBegin", 74),
    ("paintFormXObjectEnd", 75),
    ("beginGroup", 76),
    ("endGroup", 77),
    ("beginAnnotation", 80),
    ("endAnnotation", 81),
    ("paintImageMaskXObject", 83),
    ("paintImageMaskXObjectGroup", 84),
    ("paintImageXObject", 85),
    ("paintInlineImageXObject", 86),
    ("paintInlineImageXObjectGroup", 87),
    ("paintImageXObjectRepeat", 88),
    ("paintImageMaskXObjectRepeat", 89),
    ("paintSolidColorImageMask", 90),
    ("constructPath", 91),
    ("setStrokeTransparent", 92),
    ("setFillTransparent", 93),
];

/// Reverse lookup from raw opcodes to symbolic operator names.
///
/// Built once from the renderer's `name -> code` enumeration. The enumeration
/// is expected to be a bijection; when two names share a code the one seen
/// last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpcodeTable {
    names: HashMap<u32, String>,
}

impl OpcodeTable {
    /// Invert a `name -> code` enumeration.
    pub fn resolve<I, S>(name_to_code: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let names = name_to_code.into_iter().map(|(name, code)| (code, name.into())).collect();
        Self { names }
    }

    /// Table for the host renderer's standard enumeration.
    pub fn builtin() -> Self {
        Self::resolve(BUILTIN_OPS.iter().copied())
    }

    /// Symbolic name of `opcode`, if known.
    pub fn name_of(&self, opcode: u32) -> Option<&str> {
        self.names.get(&opcode).map(String::as_str)
    }

    /// Name to show for `opcode`: the symbolic name, or the raw number.
    pub fn display_name(&self, opcode: u32) -> Cow<'_, str> {
        match self.name_of(opcode) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(opcode.to_string()),
        }
    }

    /// Number of known opcodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
