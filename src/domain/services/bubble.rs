#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use super::markdown::sanitize;
use super::Markdown;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn spans_width(spans: &[Span]) -> usize {
    return spans.iter().map(|span| return span.content.width()).sum();
}

/// Word wraps styled spans to `max_width` columns. Words longer than a full
/// row are split on character boundaries.
fn wrap_spans(spans: Vec<Span<'static>>, max_width: usize) -> Vec<Vec<Span<'static>>> {
    let mut rows = vec![];
    let mut row: Vec<Span<'static>> = vec![];
    let mut row_width = 0;

    for span in spans {
        for word in span.content.split_inclusive(' ') {
            let word_width = word.trim_end().width();
            if row_width > 0 && row_width + word_width > max_width {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            let mut chunk = String::new();
            for char in word.chars() {
                let char_width = char.to_string().width();
                if row_width + chunk.width() + char_width > max_width && char != ' ' {
                    if !chunk.is_empty() {
                        row.push(Span::styled(std::mem::take(&mut chunk), span.style));
                    }
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                    row_width = 0;
                }
                chunk.push(char);
            }

            row_width += chunk.width();
            row.push(Span::styled(chunk, span.style));
        }
    }
    rows.push(row);

    return rows
        .into_iter()
        .map(|mut row| {
            if let Some(last) = row.last_mut() {
                last.content = last.content.trim_end().to_string().into();
            }
            return row;
        })
        .collect();
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message, alignment: BubbleAlignment, window_max_width: usize) -> Bubble {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    /// Bot replies are markdown, everything else is shown as typed.
    fn content_lines(&self, max_width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![];
        if self.message.author == Author::Bot {
            lines = Markdown::render(&self.message.text, max_width);
        } else {
            for line in self.message.text.lines() {
                lines.push(Line::from(sanitize(line)));
            }
        }

        if lines.is_empty() {
            lines.push(Line::from(""));
        }

        return lines;
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_allowed = self.get_max_allowed_length();
        let content = self.content_lines(max_allowed);
        let max_line_length = self.get_max_line_length(&content, max_allowed);

        let mut lines = vec![];
        for line in content {
            // Lines that already fit, such as fitted tables, are kept as drawn.
            if line.width() <= max_line_length {
                lines.push(self.spans_to_line(line.spans, max_line_length));
                continue;
            }

            for row in wrap_spans(line.spans, max_line_length) {
                lines.push(self.spans_to_line(row, max_line_length));
            }
        }

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'static>>, max_line_length: usize) -> Line<'static> {
        let fill = " ".repeat(max_line_length.saturating_sub(spans_width(&spans)));

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(self.highlight_span(format!("{fill} │")));

        let outer_bubble_padding = " ".repeat(
            self.window_max_width
                .saturating_sub(max_line_length + Bubble::style_config().bubble_padding),
        );

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_allowed_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        return self
            .window_max_width
            .saturating_sub(line_border_width)
            .max(1);
    }

    fn get_max_line_length(&self, content: &[Line], max_allowed: usize) -> usize {
        let mut max_line_length = content
            .iter()
            .map(|line| return line.width())
            .max()
            .unwrap_or(0)
            .min(max_allowed);

        let username = self.message.author.to_string();
        if max_line_length < username.width() {
            max_line_length = username.width();
        }

        return max_line_length.max(1);
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let username = self.message.author.to_string();
        // Add 2 for the padding on either side of the text.
        let label_fill = "─".repeat((max_line_length + 2).saturating_sub(username.width()));
        let top_bar = format!("╭{username}{label_fill}╮");
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let bar_bubble_padding = " ".repeat(
            self.window_max_width
                .saturating_sub(max_line_length + Bubble::style_config().bubble_padding),
        );

        if self.alignment == BubbleAlignment::Left {
            let mut res = vec![self.highlight_line(format!("{top_bar}{bar_bubble_padding}"))];
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
            return res;
        }

        let mut res = vec![self.highlight_line(format!("{bar_bubble_padding}{top_bar}"))];
        res.extend(lines);
        res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.message.message_type() == MessageType::Error {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        } else if self.message.author == Author::Bot {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Rgb(138, 85, 63)), // Brown
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}
