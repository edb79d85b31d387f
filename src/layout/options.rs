//! Layout reconstruction options.

/// Thresholds used by extraction and paragraph grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Spans shorter than this (in points) are discarded as noise
    pub min_span_height: f32,

    /// Horizontal shift (in points) beyond which a line starts a new paragraph
    pub indent_threshold: f32,

    /// A vertical gap below `gap_ratio * line_height` continues a paragraph
    pub gap_ratio: f32,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum span height.
    pub fn with_min_span_height(mut self, height: f32) -> Self {
        self.min_span_height = height;
        self
    }

    /// Set the indentation threshold.
    pub fn with_indent_threshold(mut self, threshold: f32) -> Self {
        self.indent_threshold = threshold;
        self
    }

    /// Set the gap ratio.
    pub fn with_gap_ratio(mut self, ratio: f32) -> Self {
        self.gap_ratio = ratio;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            min_span_height: 5.0,
            indent_threshold: 15.0,
            gap_ratio: 0.1,
        }
    }
}
