//! Metric card painting.
//!
//! A card is a pure function of its render state and grid rectangle. It
//! always yields the same five operations in the same order: background
//! panel, accent strip, label, value, unit.

use pulseboard_core::{Color, DrawOp, MetricRenderState, Rect, TextStyle};

/// Colors and insets used for cards and the dashboard background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTheme {
    pub background: Color,
    pub panel: Color,
    pub accent: Color,
    pub label: Color,
    pub value: Color,
    pub unit: Color,
    pub accent_width: f64,
    pub padding: f64,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x0f, 0x11, 0x17),
            panel: Color::rgb(0x1b, 0x1f, 0x2a),
            accent: Color::rgb(0x3b, 0x82, 0xf6),
            label: Color::rgb(0x9c, 0xa3, 0xaf),
            value: Color::rgb(0xf9, 0xfa, 0xfb),
            unit: Color::rgb(0x6b, 0x72, 0x80),
            accent_width: 4.0,
            padding: 16.0,
        }
    }
}

/// Format a value exactly as the producer supplied it.
///
/// Uses the shortest representation that round-trips the `f64`, so `87.0`
/// renders as `87` and `12.345` as `12.345`.
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

/// Drawing operations for one card.
pub fn card_ops(state: &MetricRenderState, rect: Rect, theme: &CardTheme) -> [DrawOp; 5] {
    let text_x = rect.x + theme.padding;
    [
        DrawOp::Fill {
            rect,
            color: theme.panel,
        },
        DrawOp::Fill {
            rect: Rect::new(rect.x, rect.y, theme.accent_width, rect.height),
            color: theme.accent,
        },
        DrawOp::Text {
            x: text_x,
            y: rect.y + rect.height * 0.15,
            text: state.descriptor.label.clone(),
            style: TextStyle::Label,
            color: theme.label,
        },
        DrawOp::Text {
            x: text_x,
            y: rect.y + rect.height * 0.4,
            text: format_value(state.value),
            style: TextStyle::Value,
            color: theme.value,
        },
        DrawOp::Text {
            x: text_x,
            y: rect.y + rect.height * 0.75,
            text: state.descriptor.unit.clone(),
            style: TextStyle::Unit,
            color: theme.unit,
        },
    ]
}
