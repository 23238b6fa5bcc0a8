use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Cell;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Row;
use ratatui::widgets::Table;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use super::theme::Theme;
use crate::domain::models::Action;
use crate::domain::models::DisplayLine;
use crate::domain::models::Event;
use crate::domain::models::TablePreview;
use crate::domain::services::AppState;
use crate::domain::services::AppStateProps;
use crate::domain::services::EventsService;
use crate::domain::services::Focus;

const MAX_COLUMN_WIDTH: usize = 24;

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

fn build_textarea<'a>(theme: &Theme) -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border)
            .title("Command"),
    );
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text("connect <catalog>, list, search, load... (F1 catalogs, F2 help)");
    return textarea;
}

fn to_line<'a>(line: &'a DisplayLine, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::raw(" ".repeat(line.indent))];
    spans.extend(
        line.spans
            .iter()
            .map(|span| Span::styled(span.text.as_str(), theme.tone(span.tone))),
    );
    return Line::from(spans);
}

fn pane_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    return Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
}

fn render_header(frame: &mut Frame, app_state: &AppState, theme: &Theme, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(40)]).split(area);

    let mut title = vec![Span::styled("Interactive Cats", theme.header)];
    if app_state.waiting_for_backend {
        title.push(Span::styled("  ● working", theme.busy));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    let connection_style = if app_state.catalog.is_some() {
        theme.connected
    } else {
        theme.disconnected
    };
    let connection = Paragraph::new(app_state.connection_label())
        .style(connection_style)
        .alignment(Alignment::Right);
    frame.render_widget(connection, chunks[1]);
}

fn render_log(frame: &mut Frame, app_state: &AppState, theme: &Theme, area: Rect) {
    let lines: Vec<Line> = app_state
        .screen
        .lines()
        .map(|line| to_line(line, theme))
        .collect();

    let title = match app_state.screen.history().cursor() {
        Some(cursor) if cursor + 1 < app_state.screen.history().len() => format!(
            "Log (history {}/{})",
            cursor + 1,
            app_state.screen.history().len()
        ),
        _ => "Log".to_string(),
    };

    let scroll = u16::try_from(app_state.log_scroll.position()).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .block(pane_block(title, app_state.focus == Focus::Log, theme))
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_preview(
    frame: &mut Frame,
    app_state: &AppState,
    preview: &TablePreview,
    theme: &Theme,
    area: Rect,
) {
    let header = Row::new(
        preview
            .columns
            .iter()
            .zip(&preview.dtypes)
            .map(|(column, dtype)| Cell::from(format!("{column} ({dtype})"))),
    )
    .style(theme.table_header)
    .height(1);

    let rows: Vec<Row> = preview
        .rows
        .iter()
        .skip(app_state.table_scroll.position())
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))).style(theme.normal))
        .collect();

    let widths: Vec<Constraint> = preview
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let widest = preview
                .rows
                .iter()
                .map(|row| row.get(idx).map(|c| c.chars().count()).unwrap_or_default())
                .chain(std::iter::once(column.chars().count() + 3 + preview.dtypes[idx].len()))
                .max()
                .unwrap_or_default()
                .min(MAX_COLUMN_WIDTH);
            return Constraint::Length(u16::try_from(widest).unwrap_or(u16::MAX));
        })
        .collect();

    let title = format!(
        "Preview: {} ({} of {} rows)",
        preview.dataset_id,
        preview.rows.len(),
        preview.total_rows
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(pane_block(title, app_state.focus == Focus::Table, theme));
    frame.render_widget(table, area);
}

fn render_status(frame: &mut Frame, theme: &Theme, area: Rect) {
    let hints = "F1:Catalogs F2:Help Ctrl+P/N:History Ctrl+R:Reset Tab:Focus ↑↓:Scroll Ctrl+C:Quit";
    frame.render_widget(Paragraph::new(hints).style(theme.hint), area);
}

pub fn render(frame: &mut Frame, app_state: &mut AppState, textarea: &TextArea, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let (log_area, preview_area) = match app_state.preview {
        Some(_) => {
            let panes = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[1]);
            (panes[0], Some(panes[1]))
        }
        None => (chunks[1], None),
    };

    app_state.set_viewports(
        usize::from(log_area.height.saturating_sub(2)),
        preview_area
            .map(|area| usize::from(area.height.saturating_sub(3)))
            .unwrap_or_default(),
    );

    render_header(frame, app_state, theme, chunks[0]);
    render_log(frame, app_state, theme, log_area);
    if let (Some(preview), Some(area)) = (&app_state.preview, preview_area) {
        render_preview(frame, app_state, preview, theme, area);
    }
    frame.render_widget(textarea, chunks[2]);
    render_status(frame, theme, chunks[3]);
}

/// Draws and handles input until the actions service reports `quit` or the
/// user interrupts a running command.
pub async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state_props: AppStateProps,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let theme = Theme::dark();
    let mut app_state = AppState::new(app_state_props);
    let mut textarea = build_textarea(&theme);
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| render(frame, &mut app_state, &textarea, &theme))?;

        match events.next().await? {
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(text.replace(['\r', '\n'], " "));
            }
            Event::KeyboardEnter => {
                let line = textarea.lines().join(" ");
                if app_state.submit(&line, &tx)? {
                    textarea = build_textarea(&theme);
                }
            }
            event => {
                if app_state.handle_event(event, &tx)? {
                    break;
                }
            }
        }
    }

    return Ok(());
}
