//! Label measurement.
//!
//! Leaf blocks are sized from their label text. [`TextMeasure`] is the
//! collaborator the layout engine asks for those sizes. Two implementations
//! are provided:
//!
//! - [`FontMeasure`] shapes text with cosmic-text against the system fonts.
//! - [`EstimatedMeasure`] uses a fixed per-character advance. It is
//!   deterministic across machines and is what the tests use.

use std::sync::{Arc, Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

/// Points to pixels at standard DPI.
const PT_TO_PX: f32 = 1.33;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
const AVERAGE_ADVANCE_FACTOR: f32 = 0.55;

/// Measures the rendered size of a label.
pub trait TextMeasure {
    /// Returns the size of `text` in pixels. Empty text measures as zero.
    fn measure(&self, text: &str) -> Size;
}

/// Text measurement backed by real font metrics.
#[derive(Debug, Clone)]
pub struct FontMeasure {
    font_family: String,
    font_size: u16,
}

impl FontMeasure {
    pub fn new(font_family: impl Into<String>, font_size: u16) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(text, &self.font_family, self.font_size)
    }
}

/// Deterministic text measurement from character counts.
///
/// ```
/// use tessera_core::text::{EstimatedMeasure, TextMeasure};
///
/// let measure = EstimatedMeasure::new(10);
/// let one = measure.measure("abcd");
/// let two = measure.measure("abcd\nab");
/// assert_eq!(one.width(), two.width());
/// assert!(two.height() > one.height());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMeasure {
    font_size: u16,
}

impl EstimatedMeasure {
    pub fn new(font_size: u16) -> Self {
        Self { font_size }
    }
}

impl TextMeasure for EstimatedMeasure {
    fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let font_size_px = f32::from(self.font_size) * PT_TO_PX;
        let widest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let lines = text.lines().count().max(1);
        Size::new(
            widest as f32 * font_size_px * AVERAGE_ADVANCE_FACTOR,
            lines as f32 * font_size_px * LINE_HEIGHT_FACTOR,
        )
    }
}

/// Owns the process-wide font database, which is expensive to load.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    /// Shapes `text` and returns the extent of its layout runs.
    fn calculate_text_size(&self, text: &str, font_family: &str, font_size: u16) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        let font_size_px = f32::from(font_size) * PT_TO_PX;
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(font_family));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            max_width = text.len() as f32 * (font_size_px * AVERAGE_ADVANCE_FACTOR);
            total_height = metrics.line_height;
        } else {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                if let Some(last) = last {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
