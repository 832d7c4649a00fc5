use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::search::FetchState;
use crate::types::Repository;

const NAME_WIDTH: usize = 36;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.search.items();
    if items.is_empty() {
        let message = match app.activity {
            FetchState::Loading => "Searching...",
            _ if app.search.keyword().trim().is_empty() => "Press / to search repositories",
            _ => "No repositories found",
        };
        let block = Block::default().borders(Borders::ALL).title("Repositories");
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = NAME_WIDTH + 1 + 7 + 2 + 12 + 2;
    let flex = w.saturating_sub(fixed).max(10);

    let mut rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, repo)| repo_row(repo, i == app.selected, flex))
        .collect();

    if app.search.has_more() {
        let text = if app.activity == FetchState::Appending {
            "  Loading more..."
        } else {
            "  More results below"
        };
        rows.push(ListItem::new(Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))));
    }

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Repositories ({} of {})",
            items.len(),
            app.search.total()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn repo_row(repo: &Repository, selected: bool, flex: usize) -> ListItem<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let description = repo
        .description
        .as_deref()
        .map(|d| truncate(d, flex))
        .unwrap_or_default();
    let language = repo
        .language
        .as_deref()
        .map(|l| truncate(l, 12))
        .unwrap_or_default();

    ListItem::new(Line::from(vec![
        Span::styled(
            format!(
                "{:<width$}",
                truncate(&repo.full_name(), NAME_WIDTH),
                width = NAME_WIDTH
            ),
            style,
        ),
        Span::raw(" "),
        Span::styled(
            format!("★ {:>5}", repo.stars),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(format!("{:<12}", language), Style::default().fg(Color::Blue)),
        Span::raw("  "),
        Span::styled(
            format!("{:<flex$}", description),
            Style::default().fg(Color::Gray),
        ),
    ]))
}

/// Cut to `max` chars, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_unchanged() {
        assert_eq!(truncate("ratatui", 10), "ratatui");
    }

    #[test]
    fn truncate_long_adds_ellipsis() {
        assert_eq!(truncate("tokio-rs/tokio-console", 10), "tokio-r...");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("日本語のリポジトリ", 6), "日本語...");
    }
}
