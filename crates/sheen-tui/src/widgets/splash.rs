use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use sheen_core::motion::SplashFrame;
use sheen_core::DisplayItem;

use crate::theme::Theme;

const LOGO: &str = "P R O   C L E A N";
const LOGO_COMPACT: &str = "PRO CLEAN";

/// Pixels per terminal row when mapping vertical offsets
const ROW_PX: f64 = 12.0;

pub struct SplashWidget;

impl SplashWidget {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        splash: &SplashFrame,
        cards: &[DisplayItem],
        theme: &Theme,
    ) {
        let overlay = splash.overlay_opacity;
        let bg = Theme::fade(theme.bg1, theme.bg0, overlay);
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(bg)), area);
        if area.height < 3 {
            return;
        }

        // Logo grows from its starting scale; spacing stands in for size
        let logo = if splash.logo.scale >= 0.97 { LOGO } else { LOGO_COMPACT };
        let logo_opacity = splash.logo.opacity * overlay;
        let logo_row = area.y + area.height / 3;
        let logo_area = Rect::new(area.x, logo_row, area.width, 1);
        if logo_opacity > 0.0 {
            let logo_style = Style::default()
                .fg(Theme::fade(theme.shine, bg, logo_opacity))
                .add_modifier(Modifier::BOLD);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(logo, logo_style)))
                    .alignment(Alignment::Center),
                logo_area,
            );
        }

        if let Some(sweep) = splash.sweep {
            let width = logo.chars().count() as f64;
            let left = area.x as f64 + (area.width as f64 - width) / 2.0;
            let center = left + width * (sweep.translate / 100.0 + 0.5);
            let highlight = Theme::fade(theme.brand_light, bg, sweep.opacity * logo_opacity);
            let buf = frame.buffer_mut();
            for dx in [-1.0, 0.0, 1.0] {
                let x = (center + dx).round();
                if x >= left && x < left + width {
                    if let Some(cell) = buf.cell_mut((x as u16, logo_row)) {
                        cell.set_bg(highlight);
                    }
                }
            }
        }

        let Some(index) = splash.active_card else {
            return;
        };
        let (Some(style), Some(card)) = (splash.cards.get(index), cards.get(index)) else {
            return;
        };

        let rest_row = logo_row as f64 + 3.0;
        let row = (rest_row + style.offset_y / ROW_PX).round() as u16;
        if row >= area.y + area.height {
            return;
        }
        let card_opacity = style.opacity * overlay;
        let line = Line::from(vec![
            Span::styled(
                format!("{}/{}  ", index + 1, cards.len()),
                Style::default().fg(Theme::fade(theme.grey1, bg, card_opacity)),
            ),
            Span::styled(
                card.label.clone(),
                Style::default().fg(Theme::fade(theme.fg0, bg, card_opacity)),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            Rect::new(area.x, row, area.width, 1),
        );
    }
}
