//! Translation of structural metrics into a drawing surface size.

use std::fmt;

use crate::config::LayoutSettings;
use crate::domain::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Sizes the canvas for `metrics`. Saturates at `u32::MAX` instead of wrapping.
    pub fn from_metrics(metrics: &Metrics, layout: &LayoutSettings) -> Self {
        let levels = u32::try_from(metrics.height).unwrap_or(u32::MAX);
        let columns = u32::try_from(metrics.width).unwrap_or(u32::MAX);
        let border = layout.padding.saturating_mul(2);
        Self {
            width: columns
                .saturating_mul(layout.horizontal_spacing)
                .saturating_add(border),
            height: levels
                .saturating_mul(layout.vertical_spacing)
                .saturating_add(layout.padding_top)
                .saturating_add(border),
        }
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_seed_metrics_when_sizing_then_uses_spacing_and_padding() {
        let metrics = Metrics {
            height: 4,
            width: 6,
            node_count: 14,
        };
        let size = CanvasSize::from_metrics(&metrics, &LayoutSettings::default());
        assert_eq!(size, CanvasSize { width: 400, height: 400 });
        assert_eq!(size.to_string(), "400x400");
    }

    #[test]
    fn given_huge_spacing_when_sizing_then_saturates() {
        let metrics = Metrics {
            height: 4,
            width: 6,
            node_count: 14,
        };
        let layout = LayoutSettings {
            horizontal_spacing: u32::MAX,
            padding: u32::MAX,
            ..LayoutSettings::default()
        };
        let size = CanvasSize::from_metrics(&metrics, &layout);
        assert_eq!(size.width, u32::MAX);
        assert_eq!(size.height, u32::MAX);
    }
}
