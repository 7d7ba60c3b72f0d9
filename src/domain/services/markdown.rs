#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;

use pulldown_cmark::Alignment;
use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

/// Strips control characters, which also defuses terminal escape sequences.
pub fn sanitize(text: &str) -> String {
    return text.chars().filter(|c| return !c.is_control()).collect();
}

/// Word wraps plain text to `width` columns, splitting words that do not fit
/// on a row of their own.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut rows = vec![];
    let mut row = String::new();

    for word in text.split(' ').filter(|word| return !word.is_empty()) {
        if !row.is_empty() && row.width() + 1 + word.width() <= width {
            row.push(' ');
            row.push_str(word);
            continue;
        }

        if !row.is_empty() {
            rows.push(std::mem::take(&mut row));
        }

        for char in word.chars() {
            let char_width = char.to_string().width();
            if !row.is_empty() && row.width() + char_width > width {
                rows.push(std::mem::take(&mut row));
            }
            row.push(char);
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }

    return rows;
}

struct Link {
    url: String,
    text: String,
}

#[derive(Default)]
struct Table {
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    head_rows: usize,
    row: Vec<String>,
    cell: String,
}

impl Table {
    fn new(alignments: Vec<Alignment>) -> Table {
        return Table {
            alignments,
            ..Table::default()
        };
    }

    fn end_row(&mut self) {
        let row = std::mem::take(&mut self.row);
        self.rows.push(row);
    }

    fn end_cell(&mut self) {
        let cell = std::mem::take(&mut self.cell);
        self.row.push(cell.trim().to_string());
    }

    fn border(widths: &[usize], left: &str, middle: &str, right: &str) -> Line<'static> {
        let inner = widths
            .iter()
            .map(|width| return "─".repeat(width + 2))
            .collect::<Vec<String>>()
            .join(middle);

        return Line::from(format!("{left}{inner}{right}"));
    }

    fn pad(&self, text: &str, idx: usize, width: usize) -> String {
        let fill = width.saturating_sub(text.width());
        match self.alignments.get(idx) {
            Some(Alignment::Right) => return format!("{}{text}", " ".repeat(fill)),
            Some(Alignment::Center) => {
                let left = fill / 2;
                return format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left));
            }
            _ => return format!("{text}{}", " ".repeat(fill)),
        }
    }

    /// Shrinks the widest columns until a row, borders included, fits in
    /// `max_width`. Columns never go below one character.
    fn fit_widths(widths: &mut [usize], max_width: usize) {
        // "│ " + " │ " between cells + " │"
        let chrome = 3 * widths.len() + 1;
        let budget = max_width.saturating_sub(chrome);

        while widths.iter().sum::<usize>() > budget {
            let Some(widest) = widths.iter_mut().max_by_key(|width| return **width) else {
                return;
            };
            if *widest <= 1 {
                return;
            }
            *widest -= 1;
        }
    }

    fn into_lines(self, max_width: usize) -> Vec<Line<'static>> {
        let columns = self
            .rows
            .iter()
            .map(|row| return row.len())
            .max()
            .unwrap_or(0)
            .max(self.alignments.len());
        if columns == 0 {
            return vec![];
        }

        let mut widths = (0..columns)
            .map(|idx| {
                return self
                    .rows
                    .iter()
                    .filter_map(|row| return row.get(idx))
                    .map(|cell| return cell.width())
                    .max()
                    .unwrap_or(0)
                    .max(1);
            })
            .collect::<Vec<usize>>();
        Table::fit_widths(&mut widths, max_width);

        let mut lines = vec![Table::border(&widths, "┌", "┬", "┐")];
        for (row_idx, row) in self.rows.iter().enumerate() {
            let style = if row_idx < self.head_rows {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let cells = widths
                .iter()
                .enumerate()
                .map(|(idx, width)| {
                    let cell = row.get(idx).map(|cell| return cell.as_str()).unwrap_or("");
                    return wrap_text(cell, *width);
                })
                .collect::<Vec<Vec<String>>>();
            let height = cells.iter().map(|rows| return rows.len()).max().unwrap_or(1);

            for line_idx in 0..height {
                let mut spans = vec![Span::from("│ ")];
                for (idx, width) in widths.iter().enumerate() {
                    if idx > 0 {
                        spans.push(Span::from(" │ "));
                    }
                    let text = cells[idx]
                        .get(line_idx)
                        .map(|text| return text.as_str())
                        .unwrap_or("");
                    spans.push(Span::styled(self.pad(text, idx, *width), style));
                }
                spans.push(Span::from(" │"));
                lines.push(Line::from(spans));
            }

            if row_idx + 1 == self.head_rows && self.rows.len() > self.head_rows {
                lines.push(Table::border(&widths, "├", "┼", "┤"));
            }
        }
        lines.push(Table::border(&widths, "└", "┴", "┘"));

        return lines;
    }
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    in_code_block: bool,
    link: Option<Link>,
    max_width: usize,
    table: Option<Table>,
}

impl Renderer {
    fn style(&self) -> Style {
        return self
            .styles
            .iter()
            .fold(Style::default(), |acc, style| return acc.patch(*style));
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if let Some(link) = self.link.as_mut() {
            link.text.push_str(text);
        }

        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(&sanitize(text));
            return;
        }

        if self.in_code_block {
            for line in text.lines() {
                self.lines.push(Line::from(vec![
                    Span::from("  "),
                    Span::styled(sanitize(line), Style::default().fg(Color::Yellow)),
                ]));
            }
            return;
        }

        self.spans.push(Span::styled(sanitize(text), style));
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }

        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        self.flush();
        if let Some(last) = self.lines.last() {
            if last.width() > 0 {
                self.lines.push(Line::from(""));
            }
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { .. } => {
                self.flush();
                self.styles.push(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let mut bullet = "• ".to_string();
                if let Some(Some(number)) = self.lists.last_mut() {
                    bullet = format!("{number}. ");
                    *number += 1;
                }
                self.spans
                    .push(Span::from(format!("{}{bullet}", "  ".repeat(depth))));
            }
            Tag::Table(alignments) => {
                self.flush();
                self.table = Some(Table::new(alignments));
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
            }
            Tag::Emphasis => self.styles.push(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.styles.push(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.styles
                    .push(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { dest_url, .. } => {
                self.styles
                    .push(Style::default().add_modifier(Modifier::UNDERLINED));
                self.link = Some(Link {
                    url: sanitize(&dest_url),
                    text: String::new(),
                });
            }
            _ => (),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.blank(),
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                    table.head_rows = table.rows.len();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.lines.extend(table.into_lines(self.max_width));
                }
                self.blank();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                // Autolinks already show their target as the link text.
                if let Some(link) = self.link.take() {
                    if !link.url.is_empty() && link.url != link.text {
                        self.push_text(&format!(" ({})", link.url), self.style());
                    }
                }
            }
            _ => (),
        }
    }

    fn event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text, self.style()),
            Event::Code(code) => {
                let style = self.style().fg(Color::Yellow);
                self.push_text(&code, style);
            }
            Event::SoftBreak => self.push_text(" ", self.style()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::from("─".repeat(self.max_width.min(20))));
                self.blank();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_text(marker, Style::default());
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                tracing::debug!(html = %&*html, "Dropped raw HTML from markdown");
            }
            _ => (),
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while let Some(last) = self.lines.last() {
            if last.width() > 0 {
                break;
            }
            self.lines.pop();
        }

        return self.lines;
    }
}

pub struct Markdown {}

impl Markdown {
    /// Renders GitHub flavoured markdown to styled lines. Raw HTML is dropped
    /// and control characters are stripped from all text. Tables are fitted
    /// to `max_width`, everything else is left for the caller to wrap.
    pub fn render(text: &str, max_width: usize) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut renderer = Renderer {
            max_width,
            ..Renderer::default()
        };
        for event in Parser::new_ext(text, options) {
            renderer.event(event);
        }

        return renderer.finish();
    }
}
