use anyhow::Result;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use test_utils::markdown_fixture;

use super::BubbleList;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::services::Bubble;
use crate::domain::services::BubbleAlignment;

fn messages() -> Vec<Message> {
    Config::set(ConfigKey::Username, "testuser");

    return vec![
        Message::new(Author::User, "Hi there!"),
        Message::new(Author::Bot, markdown_fixture()),
    ];
}

#[test]
fn it_has_no_cached_lines() {
    let bubble_list = BubbleList::default();

    assert_eq!(bubble_list.cache.len(), 0);
    assert!(bubble_list.is_empty());
}

#[test]
fn it_caches_lines() {
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages(), 50);

    assert_eq!(bubble_list.cache.len(), 2);
}

#[test]
fn it_returns_correct_length() {
    let messages = messages();
    let bot_lines = Bubble::new(&messages[1], BubbleAlignment::Left, 50)
        .as_lines()
        .len();

    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.len(), 3 + bot_lines);
}

#[test]
fn it_drops_cache_entries_for_removed_messages() {
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages(), 50);
    bubble_list.set_messages(&[], 50);

    assert_eq!(bubble_list.cache.len(), 0);
    assert_eq!(bubble_list.len(), 0);
}

#[test]
fn it_rebuilds_on_width_change() {
    let mut bubble_list = BubbleList::default();
    let messages = vec![Message::new(
        Author::Bot,
        "A reply that is long enough to wrap when the window gets narrow.",
    )];

    bubble_list.set_messages(&messages, 100);
    let wide = bubble_list.len();
    bubble_list.set_messages(&messages, 30);

    assert!(bubble_list.len() > wide);
}

#[test]
fn it_renders_nothing_when_empty() -> Result<()> {
    let mut terminal = Terminal::new(TestBackend::new(20, 3))?;
    let bubble_list = BubbleList::default();

    terminal.draw(|frame| {
        let area = frame.size();
        bubble_list.render(frame, area, 0);
    })?;

    terminal
        .backend()
        .assert_buffer(&Buffer::with_lines(vec![" ".repeat(20); 3]));
    return Ok(());
}

#[test]
fn it_renders_cached_bubbles() -> Result<()> {
    let mut terminal = Terminal::new(TestBackend::new(50, 10))?;
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages(), 50);

    terminal.draw(|frame| {
        let area = frame.size();
        bubble_list.render(frame, area, 0);
    })?;

    let rendered = terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| return cell.symbol.to_string())
        .collect::<String>();
    assert!(rendered.contains("│ Hi there! │"));
    return Ok(());
}
