use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use sheen_core::motion::{RevealFrame, StepperFrame};
use sheen_core::DisplayItem;

use crate::theme::Theme;

pub struct ServicesWidget;

impl ServicesWidget {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        services: &[DisplayItem],
        stepper: &StepperFrame,
        reveal: &RevealFrame,
        focused: bool,
        theme: &Theme,
    ) {
        let border_color = if focused { theme.accent } else { theme.grey0 };
        let mut title = vec![Span::styled(
            " Services ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )];
        if !stepper.visible.is_empty() {
            title.push(Span::styled(
                format!("{}/{} ", stepper.start_index + 1, services.len()),
                Style::default().fg(theme.grey1),
            ));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if stepper.visible.is_empty() {
            return;
        }

        let count = stepper.visible.len() as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
            .split(inner);

        for (slot, index) in columns.iter().zip(&stepper.visible) {
            let Some(service) = services.get(*index) else {
                continue;
            };
            // Cards still waiting for their entrance leave an empty slot
            let opacity = match reveal.items.get(*index) {
                Some(item) if !item.visible => continue,
                Some(item) => item.opacity,
                None => 1.0,
            };
            let card = Paragraph::new(Line::from(Span::styled(
                service.label.as_str(),
                Style::default().fg(Theme::fade(theme.fg0, theme.bg1, opacity)),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Theme::fade(theme.brand, theme.bg0, opacity)))
                    .style(Style::default().bg(theme.bg1)),
            );
            frame.render_widget(card, *slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use sheen_core::motion::RevealItem;

    fn services() -> Vec<DisplayItem> {
        ["Wash", "Wax", "Polish", "Coat", "Tint"]
            .iter()
            .map(|label| DisplayItem::new("", *label))
            .collect()
    }

    fn revealed(visible: &[bool]) -> RevealFrame {
        RevealFrame {
            triggered: true,
            settled: visible.iter().all(|v| *v),
            items: visible
                .iter()
                .map(|visible| RevealItem {
                    visible: *visible,
                    opacity: if *visible { 1.0 } else { 0.0 },
                    offset_y: 0.0,
                })
                .collect(),
        }
    }

    fn draw_row(stepper: &StepperFrame, reveal: &RevealFrame) -> (String, String) {
        let services = services();
        let mut terminal = Terminal::new(TestBackend::new(80, 5)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                ServicesWidget::render(
                    frame,
                    area,
                    &services,
                    stepper,
                    reveal,
                    false,
                    &Theme::default(),
                )
            })
            .expect("draw");

        let buffer = terminal.backend().buffer();
        let top: String = (0..80u16).map(|x| buffer[(x, 0u16)].symbol().to_string()).collect();
        let row: String = (0..80u16).map(|x| buffer[(x, 2u16)].symbol().to_string()).collect();
        (top, row)
    }

    #[test]
    fn test_renders_visible_window_in_order() {
        let stepper = StepperFrame {
            start_index: 3,
            visible: vec![3, 4, 0, 1],
            auto_advancing: true,
        };
        let (top, row) = draw_row(&stepper, &revealed(&[true; 5]));
        let coat = row.find("Coat").expect("coat shown");
        let tint = row.find("Tint").expect("tint shown");
        let wash = row.find("Wash").expect("wash shown");
        assert!(coat < tint && tint < wash);
        assert!(!row.contains("Polish"));
        assert!(top.contains("4/5"));
    }

    #[test]
    fn test_unrevealed_cards_stay_empty() {
        let stepper = StepperFrame {
            start_index: 0,
            visible: vec![0, 1, 2, 3],
            auto_advancing: true,
        };
        let (_, row) = draw_row(&stepper, &revealed(&[true, true, false, false, false]));
        assert!(row.contains("Wash") && row.contains("Wax"));
        assert!(!row.contains("Polish") && !row.contains("Coat"));
    }
}
