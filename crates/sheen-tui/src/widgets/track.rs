use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use sheen_core::content::duplicated;
use sheen_core::motion::LoopFrame;
use sheen_core::DisplayItem;

use crate::theme::Theme;

/// Terminal columns taken by one item, including its gap
pub const CARD_COLS: usize = 24;

/// A looping track of items, scrolled by a `LoopFrame`
pub struct TrackWidget<'a> {
    title: &'a str,
    items: &'a [DisplayItem],
    item_width: f64,
    copies: usize,
}

impl<'a> TrackWidget<'a> {
    pub fn new(title: &'a str, items: &'a [DisplayItem], item_width: f64, copies: usize) -> Self {
        Self {
            title,
            items,
            item_width,
            copies,
        }
    }

    /// Column offset for a track position
    pub fn shift(&self, position: f64) -> usize {
        let px_per_col = self.item_width / CARD_COLS as f64;
        let period = self.items.len() * CARD_COLS;
        if px_per_col <= 0.0 || period == 0 {
            return 0;
        }
        ((position / px_per_col).round() as usize) % period
    }

    /// Enough copies that the visible window never runs past the end
    fn copies_for(&self, width: usize) -> usize {
        let period = (self.items.len() * CARD_COLS).max(1);
        self.copies.max(1 + width.div_ceil(period))
    }

    fn card(text: &str) -> String {
        let inner = CARD_COLS - 4;
        let text: String = text.chars().take(inner).collect();
        format!("[ {:<width$} ]", text, width = inner)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, track: &LoopFrame, theme: &Theme) {
        let mut title = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )];
        if track.paused {
            title.push(Span::styled("(paused) ", Style::default().fg(theme.paused)));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg0));
        let inner_width = block.inner(area).width as usize;

        let strip = duplicated(self.items, self.copies_for(inner_width));
        let labels: String = strip.iter().map(|item| Self::card(&item.label)).collect();
        let images: String = strip.iter().map(|item| Self::card(&item.image)).collect();
        let lines = vec![
            Line::from(Span::styled(labels, Style::default().fg(theme.fg0))),
            Line::from(Span::styled(images, Style::default().fg(theme.grey1))),
        ];

        let shift = self.shift(track.position).min(u16::MAX as usize) as u16;
        let paragraph = Paragraph::new(lines).block(block).scroll((0, shift));
        frame.render_widget(paragraph, area);
    }
}
