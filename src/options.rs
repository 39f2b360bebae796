//! Layout options and configuration.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::writer::MAX_PAGES;

/// Default number of characters per row.
pub const DEFAULT_COLUMNS: usize = 80;
/// Default number of rows per page.
pub const DEFAULT_ROWS: usize = 60;
/// Default tab stop width.
pub const DEFAULT_TAB_STOP: usize = 8;
/// Default horizontal text offset in points.
pub const DEFAULT_OFFSET_X: u32 = 72;
/// Default vertical text offset in points, measured from the top edge.
pub const DEFAULT_OFFSET_Y: u32 = 72;
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: u32 = 10;

/// Options controlling how text is laid out on pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutOptions {
    /// Characters per row; longer lines wrap onto the next row
    pub columns: usize,

    /// Rows per page (0 = no limit)
    pub rows: usize,

    /// Tab stop width in columns
    pub tab_stop: usize,

    /// Distance of the text block from the left edge, in points
    pub offset_x: u32,

    /// Distance of the first baseline from the top edge, in points
    pub offset_y: u32,

    /// Font size in points
    pub font_size: u32,

    /// Standard font used for all text
    pub font: Font,

    /// Maximum number of pages before assembly aborts
    pub max_pages: usize,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set characters per row.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Set rows per page.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Set tab stop width.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop;
        self
    }

    /// Set text offsets in points.
    pub fn with_offsets(mut self, x: u32, y: u32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Set font size in points.
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Set font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Set the page ceiling.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Check that every value is usable by the page assembler.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(Error::InvalidOption(
                "columns must be a positive number".to_string(),
            ));
        }
        if self.tab_stop == 0 {
            return Err(Error::InvalidOption(
                "tab stop must be a positive number".to_string(),
            ));
        }
        if self.font_size == 0 {
            return Err(Error::InvalidOption("font size must be positive".to_string()));
        }
        if self.max_pages == 0 || self.max_pages > MAX_PAGES {
            return Err(Error::InvalidOption(format!(
                "page limit must be between 1 and {}, not {}",
                MAX_PAGES, self.max_pages
            )));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tab_stop: DEFAULT_TAB_STOP,
            offset_x: DEFAULT_OFFSET_X,
            offset_y: DEFAULT_OFFSET_Y,
            font_size: DEFAULT_FONT_SIZE,
            font: Font::Mono,
            max_pages: MAX_PAGES,
        }
    }
}

/// One of the standard 14 fonts, selected by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    /// Helvetica
    Sans,
    /// Times-Roman
    Serif,
    /// Courier
    #[default]
    Mono,
}

impl Font {
    /// PostScript name of the base font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Sans => "Helvetica",
            Font::Serif => "Times-Roman",
            Font::Mono => "Courier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_columns(100)
            .with_rows(40)
            .with_tab_stop(4)
            .with_offsets(36, 48)
            .with_font_size(12)
            .with_font(Font::Serif)
            .with_max_pages(10);

        assert_eq!(options.columns, 100);
        assert_eq!(options.rows, 40);
        assert_eq!(options.tab_stop, 4);
        assert_eq!(options.offset_x, 36);
        assert_eq!(options.offset_y, 48);
        assert_eq!(options.font_size, 12);
        assert_eq!(options.font, Font::Serif);
        assert_eq!(options.max_pages, 10);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.columns, 80);
        assert_eq!(options.rows, 60);
        assert_eq!(options.font, Font::Mono);
        assert_eq!(options.max_pages, MAX_PAGES);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_bounds() {
        assert!(LayoutOptions::new().with_columns(0).validate().is_err());
        assert!(LayoutOptions::new().with_tab_stop(0).validate().is_err());
        assert!(LayoutOptions::new().with_font_size(0).validate().is_err());
        assert!(LayoutOptions::new().with_max_pages(0).validate().is_err());
        assert!(LayoutOptions::new()
            .with_max_pages(MAX_PAGES + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_rows_is_allowed() {
        assert!(LayoutOptions::new().with_rows(0).validate().is_ok());
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(Font::Sans.base_font(), "Helvetica");
        assert_eq!(Font::Serif.base_font(), "Times-Roman");
        assert_eq!(Font::Mono.base_font(), "Courier");
    }

    #[test]
    fn test_options_serialize() {
        let json = serde_json::to_string(&LayoutOptions::default()).unwrap();
        assert!(json.contains("\"font\":\"mono\""));
        assert!(json.contains("\"columns\":80"));
    }
}
