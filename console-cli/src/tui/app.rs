// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! TUI console using ratatui.
//!
//! Shows a resource's LIST screen with a selectable row cursor and opens the
//! VIEW screen of the selected row beside it.

use std::io::stdout;
use std::time::Duration;

use bencher_console_core::deck::Deck;
use bencher_console_core::table::Table as ListTable;
use bencher_console_core::{
    Console, ConsoleResult, Operation, OperationConfig, PathParams, Screen, ScreenState,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::client::HttpClient;

/// Dashboard state.
struct App<'a> {
    console: &'a Console<HttpClient>,
    resource: String,
    params: PathParams,
    /// Route parameter of the VIEW screen, if the resource has one.
    view_param: Option<String>,
    list_pathname: String,
    list: Screen<ListTable>,
    detail: Option<Screen<Deck>>,
    table_state: TableState,
    should_quit: bool,
}

impl<'a> App<'a> {
    fn new(
        console: &'a Console<HttpClient>,
        resource: &str,
        params: PathParams,
    ) -> ConsoleResult<Self> {
        let view_param = match console.schema().get(resource, Operation::View) {
            Some(OperationConfig::View(view)) => Some(view.param.clone()),
            _ => None,
        };
        let list_pathname = console.pathname(resource, Operation::List, &params)?;

        Ok(Self {
            console,
            resource: resource.to_string(),
            params,
            view_param,
            list_pathname,
            list: Screen::new(),
            detail: None,
            table_state: TableState::default(),
            should_quit: false,
        })
    }

    fn rows(&self) -> usize {
        match self.list.state() {
            ScreenState::Ready(table) => table.rows.len(),
            _ => 0,
        }
    }

    async fn refresh(&mut self) -> ConsoleResult<()> {
        self.console
            .refresh_list(&mut self.list, &self.resource, &self.params)
            .await?;
        let rows = self.rows();
        self.table_state
            .select(if rows == 0 { None } else { Some(0) });
        Ok(())
    }

    fn move_cursor(&mut self, down: bool) {
        let rows = self.rows();
        if rows == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(rows - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    /// Slug of the selected row, taken from its navigation target.
    fn selected_slug(&self) -> Option<String> {
        let ScreenState::Ready(table) = self.list.state() else {
            return None;
        };
        let row = table.rows.get(self.table_state.selected()?)?;
        row.path
            .strip_prefix(self.list_pathname.as_str())?
            .strip_prefix('/')
            .filter(|slug| !slug.is_empty() && !slug.contains('/'))
            .map(str::to_string)
    }

    async fn open_detail(&mut self) -> ConsoleResult<()> {
        let (Some(param), Some(slug)) = (self.view_param.clone(), self.selected_slug()) else {
            return Ok(());
        };
        let params = self.params.clone().with(param, slug);
        self.detail = Some(self.console.view(&self.resource, &params).await?);
        Ok(())
    }

    fn close_detail(&mut self) {
        if let Some(mut detail) = self.detail.take() {
            detail.unmount();
        }
    }
}

/// Run the TUI dashboard for one resource.
pub async fn run_dashboard(
    console: &Console<HttpClient>,
    resource: &str,
    params: PathParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(console, resource, params)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    app.refresh().await?;

    loop {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Esc if app.detail.is_some() => app.close_detail(),
                        KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('r') => {
                            app.close_detail();
                            app.refresh().await?;
                        }
                        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
                        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
                        KeyCode::Enter => app.open_detail().await?,
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn placeholder_row(text: &str, columns: usize) -> Row<'_> {
    let mut cells = vec![Cell::from(text)];
    cells.extend((1..columns).map(|_| Cell::from("-")));
    Row::new(cells).style(Style::default().fg(Color::DarkGray))
}

fn render(frame: &mut Frame, app: &mut App<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    // Title
    let title = Paragraph::new(format!(" BENCHER CONSOLE  {} ", app.list_pathname))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(title, main_layout[0]);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_layout[1]);

    render_list(frame, app, content_layout[0]);
    render_detail(frame, app, content_layout[1]);

    // Footer
    let footer = Paragraph::new(" ↑/↓ select  Enter view  r refresh  Esc back  q quit ")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, main_layout[2]);
}

fn render_list(frame: &mut Frame, app: &mut App<'_>, area: Rect) {
    let (title, header, rows, columns) = match app.list.state() {
        ScreenState::Ready(table) => {
            let columns = table.columns.len() + 1;
            let mut header = vec![Cell::from("")];
            header.extend(
                table
                    .columns
                    .iter()
                    .map(|column| Cell::from(column.clone().unwrap_or_default())),
            );
            let rows: Vec<Row> = if table.is_empty() {
                vec![placeholder_row("(none)", columns)]
            } else {
                table
                    .rows
                    .iter()
                    .map(|row| {
                        let mut cells = vec![Cell::from(row.key.clone())];
                        cells.extend(
                            row.cells
                                .iter()
                                .map(|cell| Cell::from(cell.clone().unwrap_or_default())),
                        );
                        Row::new(cells)
                    })
                    .collect()
            };
            (table.title.clone(), header, rows, columns)
        }
        ScreenState::Loading => (
            app.resource.clone(),
            vec![Cell::from("")],
            vec![placeholder_row("Loading...", 1)],
            1,
        ),
        ScreenState::Failed(message) => (
            app.resource.clone(),
            vec![Cell::from("")],
            vec![Row::new(vec![Cell::from(message.clone())])
                .style(Style::default().fg(Color::Red))],
            1,
        ),
    };

    let widths: Vec<Constraint> = (0..columns)
        .map(|_| Constraint::Ratio(1, columns as u32))
        .collect();
    let table = Table::new(rows, widths)
        .header(
            Row::new(header).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Yellow),
            ),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_detail(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let Some(detail) = &app.detail else {
        let hint = if app.view_param.is_some() {
            "Press Enter to view the selected row"
        } else {
            "This resource has no detail view"
        };
        let paragraph = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block.title(" Detail "));
        frame.render_widget(paragraph, area);
        return;
    };

    let (title, lines) = match detail.state() {
        ScreenState::Ready(deck) => {
            let lines: Vec<Line> = deck
                .cards
                .iter()
                .flat_map(|card| {
                    [
                        Line::from(Span::styled(
                            card.field.clone(),
                            Style::default().fg(Color::Yellow),
                        )),
                        Line::from(card.value.clone().unwrap_or_else(|| "-".to_string())),
                        Line::from(""),
                    ]
                })
                .collect();
            (deck.title.clone().unwrap_or_default(), lines)
        }
        ScreenState::Loading => (String::new(), vec![Line::from("Loading...")]),
        ScreenState::Failed(message) => (
            String::new(),
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
        ),
    };

    let paragraph = Paragraph::new(lines).block(block.title(format!(" {} ", title)));
    frame.render_widget(paragraph, area);
}
