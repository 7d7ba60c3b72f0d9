#[cfg(test)]
#[path = "typing_test.rs"]
mod tests;

use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::backend::Backend;
use ratatui::Frame;

/// Three dots, one lit at a time, advanced on every UI tick.
#[derive(Default)]
pub struct TypingIndicator {
    frame: usize,
}

impl TypingIndicator {
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn spans(&self) -> Vec<Span<'static>> {
        let lit = self.frame % 3;
        let mut spans = vec![];
        for idx in 0..3 {
            if idx > 0 {
                spans.push(Span::from(" "));
            }

            let style = if idx == lit {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled("●", style));
        }

        return spans;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect) {
        frame.render_widget(
            Paragraph::new(Line::from(self.spans())).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .padding(Padding::new(1, 1, 0, 0)),
            ),
            rect,
        );
    }
}
