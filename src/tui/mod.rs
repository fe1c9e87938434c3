//! Ratatui-based terminal UI.
//!
//! The TUI loads one batch of case records up front, then lets the user
//! explore it interactively: success rates as a bar chart, the per-strategy
//! table, and a scenario panel that re-evaluates as the focus strategy or
//! claim value changes. `r` re-enriches the same batch with a new seed.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Row, Table},
    Terminal,
};

use crate::app::SourceStatus;
use crate::cli::RunArgs;
use crate::domain::{DataSource, RawCase, RunConfig};
use crate::error::AppError;
use crate::report::fmt_money;

/// Start the TUI.
pub fn run(args: RunArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: RunConfig,
    /// The loaded batch; re-enrichment reuses it instead of refetching.
    raw: Vec<RawCase>,
    source: SourceStatus,
    run: Option<crate::app::pipeline::RunOutput>,
    claim_input: String,
    selected_field: usize,
    editing_claim: bool,
    status: String,
}

impl App {
    fn new(args: RunArgs) -> Result<Self, AppError> {
        let config = crate::app::run_config_from_args(&args)?;
        let (mut raw, mut source) = crate::app::load_records(&config)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let run = match crate::app::pipeline::run_batch(raw.clone(), &config, &mut rng) {
            Ok(run) => run,
            Err(no_data) if config.source == DataSource::Auto => {
                raw = crate::data::sample_cases()?;
                source = SourceStatus {
                    label: "embedded sample (fallback)".to_string(),
                    detail: no_data.to_string(),
                };
                let mut rng = StdRng::seed_from_u64(config.seed);
                crate::app::pipeline::run_batch(raw.clone(), &config, &mut rng)
                    .map_err(|e| AppError::new(3, format!("Sample dataset: {e}.")))?
            }
            Err(no_data) => return Err(AppError::new(3, format!("{no_data}."))),
        };
        let status = format!("Loaded {} case(s) from {}.", run.rows_used, source.label);

        Ok(Self {
            config,
            raw,
            source,
            run: Some(run),
            claim_input: String::new(),
            selected_field: 0,
            editing_claim: false,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_claim {
            self.handle_claim_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == 1 {
                    self.editing_claim = true;
                    self.claim_input.clear();
                    self.status =
                        "Editing claim value. Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('r') => {
                self.config.seed = self.config.seed.wrapping_add(1);
                self.rerun();
                self.status = format!("Re-enriched with seed {}.", self.config.seed);
            }
            _ => {}
        }

        false
    }

    fn handle_claim_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_claim = false;
                self.status = "Claim edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_claim = false;
                self.apply_claim_input();
            }
            KeyCode::Backspace => {
                self.claim_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' {
                    self.claim_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                self.config.focus_strategy = if delta >= 0 {
                    self.config.focus_strategy.next()
                } else {
                    self.config.focus_strategy.prev()
                };
                self.rerun();
                self.status = format!("focus: {}", self.config.focus_strategy.display_name());
            }
            1 => {
                let step = 10_000.0 * f64::from(delta);
                self.config.scenario_claim_value =
                    (self.config.scenario_claim_value + step).max(0.0);
                self.rerun();
                self.status =
                    format!("claim: {}", fmt_money(self.config.scenario_claim_value));
            }
            2 => {
                if delta >= 0 {
                    self.config.seed = self.config.seed.wrapping_add(1);
                } else {
                    self.config.seed = self.config.seed.wrapping_sub(1);
                }
                self.rerun();
                self.status = format!("seed: {}", self.config.seed);
            }
            _ => {}
        }
    }

    fn apply_claim_input(&mut self) {
        let trimmed = self.claim_input.trim();
        if trimmed.is_empty() {
            self.status = "Claim unchanged.".to_string();
            return;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => {
                self.config.scenario_claim_value = v;
                self.rerun();
                self.status = format!("claim: {}", fmt_money(v));
            }
            _ => {
                self.status = format!("Invalid claim value '{trimmed}'.");
            }
        }
    }

    fn rerun(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        match crate::app::pipeline::run_batch(self.raw.clone(), &self.config, &mut rng) {
            Ok(run) => self.run = Some(run),
            Err(no_data) => {
                self.run = None;
                self.status = no_data.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("litsim", Style::default().fg(Color::Cyan)),
            Span::raw(" — case strategy simulator"),
        ]));

        let (rows_in, rows_used) = self
            .run
            .as_ref()
            .map(|r| (r.rows_in, r.rows_used))
            .unwrap_or((0, 0));
        let category = self
            .config
            .category_filter
            .as_deref()
            .unwrap_or("all categories");

        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | cases: {rows_used}/{rows_in} | category: {category} | seed: {}",
                self.source.label, self.config.seed,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(top[1]);

        self.draw_success_chart(frame, top[0]);
        self.draw_aggregate_table(frame, right[0]);
        self.draw_scenario(frame, right[1]);
        self.draw_settings(frame, rows[1]);
    }

    fn draw_success_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Success rate (%)").borders(Borders::ALL);

        let Some(run) = &self.run else {
            frame.render_widget(
                Paragraph::new("No usable cases.")
                    .style(Style::default().fg(Color::Yellow))
                    .block(block),
                area,
            );
            return;
        };

        let bars: Vec<Bar> = run
            .aggregates
            .iter()
            .map(|row| {
                let color = if row.strategy == self.config.focus_strategy {
                    Color::Cyan
                } else {
                    Color::Gray
                };
                Bar::default()
                    .label(Line::from(row.strategy.display_name()))
                    .value(row.success_rate.round() as u64)
                    .style(Style::default().fg(color))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .bar_width(9)
            .bar_gap(2)
            .max(100)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_aggregate_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("By strategy").borders(Borders::ALL);

        let Some(run) = &self.run else {
            frame.render_widget(block, area);
            return;
        };

        let header = Row::new(["Strategy", "Success", "Avg days", "Avg impact", "Cases"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = run
            .aggregates
            .iter()
            .map(|r| {
                Row::new(vec![
                    r.strategy.display_name().to_string(),
                    format!("{:.1}%", r.success_rate),
                    r.mean_duration_days.to_string(),
                    fmt_money(r.mean_impact),
                    r.case_count.to_string(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(14),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, area);
    }

    fn draw_scenario(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Scenario").borders(Borders::ALL);

        let Some(run) = &self.run else {
            frame.render_widget(block, area);
            return;
        };
        let s = &run.scenario;

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(format!(
            "{} at {}",
            s.strategy.display_name(),
            fmt_money(s.claim_value),
        )));

        if s.delta_success_rate.is_none() {
            lines.push(Line::from(Span::styled(
                "No historical cases for this strategy.",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(format!("Success rate:     {:.1}%", s.success_rate)));
            lines.push(Line::from(format!(
                "Projected impact: {}",
                fmt_money(s.projected_impact),
            )));
            let how = if s.duration_from_model { "model" } else { "group mean" };
            lines.push(Line::from(format!(
                "Est. duration:    {:.0} days ({how})",
                s.predicted_duration_days,
            )));
            if let Some(risk) = s.risk_index {
                lines.push(Line::from(format!("Risk index:       {risk:.1}")));
            }
        }

        if let Some(model) = &run.model {
            lines.push(Line::from(Span::styled(
                format!(
                    "duration = {:.1} + {:.6} * claim  (n={})",
                    model.intercept, model.slope, model.n_used,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let claim_label = if self.editing_claim {
            format!("{}_", self.claim_input)
        } else {
            fmt_money(self.config.scenario_claim_value)
        };

        let items = vec![
            ListItem::new(format!(
                "Focus: {}",
                self.config.focus_strategy.display_name()
            )),
            ListItem::new(format!("Claim value: {claim_label}")),
            ListItem::new(format!("Seed: {}", self.config.seed)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit claim  r resample  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
