//! Print layout knobs. `Layout::default()` is the classic two-column exam index look.

/// Twentieths of a point per inch.
pub const TWIPS_PER_INCH: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub orientation: Orientation,
    /// Text columns per page.
    pub columns: u8,
    pub font: String,
    /// Body text size in points.
    pub font_size: u8,
    /// Title (section heading) size in points.
    pub title_size: u8,
    /// All four page margins, in twips.
    pub margin: u32,
    /// Hanging indent for wrapped lines of an entry, in twips.
    pub hanging_indent: u32,
    /// RGB hex of the topic text.
    pub topic_color: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            columns: 2,
            font: "Times New Roman".to_string(),
            font_size: 10,
            title_size: 32,
            margin: TWIPS_PER_INCH * 3 / 4,
            hanging_indent: TWIPS_PER_INCH / 10,
            topic_color: "1667FF".to_string(),
        }
    }
}

impl Layout {
    /// US Letter, `(width, height)` in twips.
    pub fn page_size(&self) -> (u32, u32) {
        match self.orientation {
            Orientation::Portrait => (12240, 15840),
            Orientation::Landscape => (15840, 12240),
        }
    }
}
