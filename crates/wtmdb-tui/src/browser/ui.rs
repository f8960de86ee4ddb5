//! TUI rendering logic for the movie browser.

use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::state::{BrowserState, DialogBody, DialogControl, Focus};
use crate::detail::{CardView, PLACEHOLDER};

/// Width of one card, borders included.
pub const CARD_WIDTH: u16 = 24;

/// Height of one card, borders included.
pub const CARD_HEIGHT: u16 = 5;

const BRAND: &str = "wtmDB";

/// Number of card columns that fit into `width`. Always at least one.
#[must_use]
pub fn grid_columns(width: u16) -> usize {
    usize::from(width.checked_div(CARD_WIDTH).unwrap_or(0).max(1))
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn button_style(focused: bool, enabled: bool) -> Style {
    if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// Draws the browser UI and returns the grid column count it laid out.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &BrowserState) -> usize {
    let error_height = u16::from(state.error().is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // header
            Constraint::Length(error_height), // error line
            Constraint::Min(CARD_HEIGHT),     // card grid
            Constraint::Length(3),            // load more
            Constraint::Length(2),            // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    if let Some(message) = state.error() {
        let error = Paragraph::new(message).style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[1]);
    }
    let columns = draw_grid(frame, chunks[2], state);
    draw_load_more(frame, chunks[3], state);
    draw_footer(frame, chunks[4], state);

    if state.is_dialog_open() {
        draw_dialog(frame, state);
    }
    columns
}

/// Draws the brand, search bar, and sort selector.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(30),
            Constraint::Length(32),
        ])
        .split(area);

    let brand = Paragraph::new(Span::styled(
        BRAND,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(brand, chunks[0]);

    draw_search(frame, chunks[1], state);

    let focus = state.focus();
    let sort_focused = focus == Focus::SortSelect && !state.is_dialog_open();
    let sort = Paragraph::new(Line::from(vec![
        Span::raw("\u{25c2} "),
        Span::styled(state.sort().label(), focus_style(sort_focused)),
        Span::raw(" \u{25b8}"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(sort_focused))
            .title(" Sort: s "),
    );
    frame.render_widget(sort, chunks[2]);
}

/// Cursor cell after `text` in the input `area`, measured in display
/// columns and clamped to the last cell.
fn input_cursor(area: Rect, text: &str) -> Position {
    let typed = u16::try_from(Line::from(text).width()).unwrap_or(u16::MAX);
    let max_x = area.right().saturating_sub(1);
    Position::new(area.x.saturating_add(typed).min(max_x), area.y)
}

/// Draws the search input with its Search and Clear buttons.
#[allow(clippy::indexing_slicing)]
fn draw_search(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let focus = state.focus();
    let active = !state.is_dialog_open();
    let input_focused = active && focus == Focus::SearchInput;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(input_focused))
        .title(" Search by title: / ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(11),
            Constraint::Length(10),
        ])
        .split(inner);

    let text = state.search_text();
    let input = if text.is_empty() && !input_focused {
        Paragraph::new(Span::styled(
            "Search movies\u{2026}",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(text)
    };
    frame.render_widget(input, chunks[0]);

    if input_focused {
        frame.set_cursor_position(input_cursor(chunks[0], text));
    }

    let search = Paragraph::new(Span::styled(
        " Search ",
        button_style(active && focus == Focus::SearchButton, true),
    ));
    frame.render_widget(search, chunks[1]);
    let clear = Paragraph::new(Span::styled(
        " Clear ",
        button_style(active && focus == Focus::ClearButton, true),
    ));
    frame.render_widget(clear, chunks[2]);
}

/// Draws the card grid, keeping the cursor row in view.
fn draw_grid(frame: &mut Frame, area: Rect, state: &BrowserState) -> usize {
    let focused = state.focus() == Focus::Results && !state.is_dialog_open();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(format!(" Movies ({}) ", state.movie_count()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = grid_columns(inner.width);
    if state.movie_count() == 0 {
        let empty = Paragraph::new(Span::styled(
            "No movies found.",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(empty, inner);
        return columns;
    }

    let visible_rows = usize::from(inner.height.checked_div(CARD_HEIGHT).unwrap_or(0).max(1));
    let cursor_row = state.cursor().checked_div(columns).unwrap_or(0);
    let first_row = cursor_row.saturating_sub(visible_rows.saturating_sub(1));
    let skip = first_row.saturating_mul(columns);
    let take = visible_rows.saturating_mul(columns);

    for (offset, movie) in state.visible_movies().skip(skip).take(take).enumerate() {
        let row = offset.checked_div(columns).unwrap_or(0);
        let col = offset.checked_rem(columns).unwrap_or(0);
        let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col)) else {
            break;
        };
        let card_area = Rect {
            x: inner.x.saturating_add(col.saturating_mul(CARD_WIDTH)),
            y: inner.y.saturating_add(row.saturating_mul(CARD_HEIGHT)),
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
        }
        .intersection(inner);

        let is_cursor = skip.saturating_add(offset) == state.cursor();
        draw_card(frame, card_area, &CardView::from_summary(movie), is_cursor, focused);
    }
    columns
}

/// Draws one movie card.
fn draw_card(frame: &mut Frame, area: Rect, card: &CardView, is_cursor: bool, focused: bool) {
    let border_style = match (is_cursor, focused) {
        (true, true) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::Gray),
        _ => Style::default().fg(Color::DarkGray),
    };
    let lines = vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(card.year.clone().unwrap_or_else(|| String::from(PLACEHOLDER))),
            // Poster marker; images are not drawn in the terminal.
            Span::styled(
                if card.has_poster { "  \u{25a3}" } else { "" },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            format!("\u{2605} {}", card.rating),
            Style::default().fg(Color::Yellow),
        )),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(widget, area);
}

/// Draws the load-more button.
fn draw_load_more(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let focused = state.focus() == Focus::LoadMore && !state.is_dialog_open();
    let [button_area] = Layout::horizontal([Constraint::Length(21)])
        .flex(Flex::Center)
        .areas(area);
    let button = Paragraph::new(Line::from(state.load_more_label()).centered())
        .style(button_style(focused, state.can_load_more()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(focused)),
        );
    frame.render_widget(button, button_area);
}

/// Draws the attribution and key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let year = chrono::Local::now().year();
    let hints = if state.is_dialog_open() {
        "Tab: next control  Enter: open  Esc: close"
    } else if state.focus() == Focus::SearchInput {
        "Type to search  Enter: search now  Tab: next  Esc: results  Ctrl+C: quit"
    } else {
        "Tab: next  \u{2190}\u{2191}\u{2192}\u{2193}/hjkl: move  Enter: details  /: search  s: sort  m: more  q: quit"
    };
    let footer = Paragraph::new(vec![
        Line::from(format!("\u{a9} {year} {BRAND} \u{2022} Data from TMDB")).centered(),
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))).centered(),
    ]);
    frame.render_widget(footer, area);
}

/// Area of the centered dialog.
fn dialog_area(area: Rect) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(vertical);
    dialog
}

/// Draws the detail dialog over the main screen.
#[allow(clippy::indexing_slicing)]
fn draw_dialog(frame: &mut Frame, state: &BrowserState) {
    let area = dialog_area(frame.area());
    frame.render_widget(Clear, area);

    let Some(body) = state.dialog_body() else {
        return;
    };
    let title = match body {
        DialogBody::Loaded(view) => format!(" {} ", view.title),
        DialogBody::Loading | DialogBody::Failed(_) => String::from(" Details "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let content = match body {
        DialogBody::Loading => Paragraph::new("Loading details\u{2026}"),
        DialogBody::Failed(message) => {
            Paragraph::new(message).style(Style::default().fg(Color::Red))
        }
        DialogBody::Loaded(view) => {
            let label = Style::default().fg(Color::DarkGray);
            let poster = state.poster().url().unwrap_or(PLACEHOLDER);
            Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("Released: ", label),
                    Span::raw(view.release_date.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Runtime:  ", label),
                    Span::raw(view.runtime.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Genres:   ", label),
                    Span::raw(view.genres.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Rating:   ", label),
                    Span::raw(view.rating.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Poster:   ", label),
                    Span::raw(String::from(poster)),
                ]),
                Line::default(),
                Line::from(view.overview.clone()),
            ])
            .wrap(Wrap { trim: true })
        }
    };
    frame.render_widget(content, chunks[0]);

    let focused = state.dialog_focus();
    let mut buttons = Vec::new();
    for control in state.dialog_controls() {
        let label = match control {
            DialogControl::Close => " Close ",
            DialogControl::Poster => " Open Poster ",
            DialogControl::Trailer => " \u{25b6} Watch Trailer ",
        };
        buttons.push(Span::styled(label, button_style(focused == Some(control), true)));
        buttons.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(buttons)), chunks[1]);
}
