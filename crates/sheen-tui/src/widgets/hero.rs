use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use sheen_core::motion::{DepthFrame, ReflectionFrame};

use crate::theme::Theme;

const TITLE: &str = "PRO CLEAN AUTO DETAILING";
const TAGLINE: &str = "Showroom shine, delivered";

/// Pixels per terminal row when mapping vertical translations
const ROW_PX: f64 = 8.0;

/// Columns of the reflection band
const BAND_COLS: u16 = 3;

pub struct HeroWidget;

impl HeroWidget {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        reflection: Option<ReflectionFrame>,
        depth: DepthFrame,
        theme: &Theme,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg1)), area);
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background texture drifts with the depth layer
        let bg_shift = rows(depth.background_translate_y);
        let spacing = (4.0 / depth.background_scale).round().max(1.0) as i32;
        let buf = frame.buffer_mut();
        for y in area.top()..area.bottom() {
            let line = y as i32 - area.y as i32 - bg_shift;
            if line.rem_euclid(2) != 0 {
                continue;
            }
            for x in area.left()..area.right() {
                if (x as i32 + line).rem_euclid(spacing) == 0 {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_symbol("·").set_fg(theme.grey0);
                    }
                }
            }
        }

        let middle = area.y as i32 + area.height as i32 / 2 - 1 + rows(depth.content_translate_y);
        let title_row = middle.clamp(area.y as i32, area.bottom() as i32 - 1) as u16;
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                TITLE,
                Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            Rect::new(area.x, title_row, area.width, 1),
        );
        if title_row + 1 < area.bottom() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(TAGLINE, Style::default().fg(theme.grey1))))
                    .alignment(Alignment::Center),
                Rect::new(area.x, title_row + 1, area.width, 1),
            );
        }

        if let Some(reflection) = reflection {
            Self::render_band(frame, area, reflection.offset, theme);
        }
    }

    /// Slanted highlight whose horizontal position is `offset` percent of the width
    fn render_band(frame: &mut Frame, area: Rect, offset: f64, theme: &Theme) {
        let base = band_column(area, offset);
        let buf = frame.buffer_mut();
        for (row, y) in (area.top()..area.bottom()).enumerate() {
            // Lean to the right going down
            let start = base + (row as u16) / 2;
            for x in start..start.saturating_add(BAND_COLS) {
                if x < area.right() {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_bg(Theme::fade(theme.shine, theme.bg1, 0.25));
                    }
                }
            }
        }
    }
}

fn rows(px: f64) -> i32 {
    (px / ROW_PX).round() as i32
}

/// Leftmost band column for an offset in percent
pub(crate) fn band_column(area: Rect, offset: f64) -> u16 {
    let fraction = (offset / 100.0).clamp(0.0, 1.0);
    area.x + (fraction * area.width.saturating_sub(1) as f64).round() as u16
}
