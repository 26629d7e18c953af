//! Ratatui-based terminal UI.
//!
//! One tab per cut kind. Each tab is a form: fitting types and sizes are
//! picked from the configured list and the catalog, measurements are typed.
//! Enter runs the same pipeline as the CLI and shows every cut in decimal and
//! sixteenths.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

use crate::app::pipeline::{CalcInput, CalcOutput, Workspace, job_entry, run_calculation};
use crate::calc::parse_measurement;
use crate::domain::{CutKind, DEFAULT_BUSHING_TYPE, FittingSpec, OffsetVariant};
use crate::error::{AppError, CutError};
use crate::io::{read_job_book, write_job_book};
use crate::report::{format_request, render_result};

const PREFERRED_END_TYPE: &str = "Elbow 90(Socket x Socket)";

/// Start the TUI.
pub fn run(workspace: Workspace, jobs_path: PathBuf) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(workspace, jobs_path);
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    A,
    LayIn,
    Bushing,
    B,
}

impl Slot {
    fn label(self) -> &'static str {
        match self {
            Slot::A => "A",
            Slot::LayIn => "Lay-in",
            Slot::Bushing => "Bushing",
            Slot::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    C2c,
    Overall,
    LayIn,
    Thickness,
}

impl Measure {
    fn label(self) -> &'static str {
        match self {
            Measure::C2c => "C2C",
            Measure::Overall => "Overall C2C",
            Measure::LayIn => "C2C A -> Lay-in",
            Measure::Thickness => "Bushing thickness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Type(Slot),
    Size(Slot),
    Alt(Slot),
    Measure(Measure),
    Shave,
    Job,
}

impl Field {
    fn is_text(self) -> bool {
        matches!(self, Field::Measure(_) | Field::Job)
    }
}

fn fields(kind: CutKind) -> Vec<Field> {
    let end = |slot| [Field::Type(slot), Field::Size(slot), Field::Alt(slot)];
    let mut out = Vec::new();
    out.extend(end(Slot::A));
    match kind {
        CutKind::Standard => {
            out.extend(end(Slot::B));
            out.push(Field::Measure(Measure::C2c));
        }
        CutKind::LayIn => {
            out.extend(end(Slot::LayIn));
            out.extend(end(Slot::B));
            out.push(Field::Measure(Measure::Overall));
            out.push(Field::Measure(Measure::LayIn));
        }
        CutKind::Bushing => {
            out.push(Field::Type(Slot::Bushing));
            out.push(Field::Size(Slot::Bushing));
            out.extend(end(Slot::B));
            out.push(Field::Measure(Measure::C2c));
            out.push(Field::Measure(Measure::Thickness));
        }
    }
    out.push(Field::Shave);
    out.push(Field::Job);
    out
}

#[derive(Debug, Clone, Default)]
struct Selection {
    fitting_type: String,
    size: String,
    alt: bool,
}

impl Selection {
    fn spec(&self) -> FittingSpec {
        let variant = if self.alt {
            OffsetVariant::Secondary
        } else {
            OffsetVariant::Primary
        };
        FittingSpec::new(&self.fitting_type, &self.size).with_variant(variant)
    }
}

struct App {
    workspace: Workspace,
    jobs_path: PathBuf,
    type_choices: Vec<String>,
    tab: usize,
    selected_field: usize,
    a: Selection,
    lay_in: Selection,
    bushing: Selection,
    b: Selection,
    c2c: String,
    overall: String,
    lay_in_c2c: String,
    thickness: String,
    shave: bool,
    job_name: String,
    status: String,
    output: Option<CalcOutput>,
}

impl App {
    fn new(workspace: Workspace, jobs_path: PathBuf) -> Self {
        let mut type_choices = workspace.config.supported_types.clone();
        for t in workspace.catalog.types() {
            if !type_choices.iter().any(|c| c == t) {
                type_choices.push(t.to_string());
            }
        }

        let mut app = Self {
            workspace,
            jobs_path,
            type_choices,
            tab: 0,
            selected_field: 0,
            a: Selection::default(),
            lay_in: Selection::default(),
            bushing: Selection::default(),
            b: Selection::default(),
            c2c: String::new(),
            overall: String::new(),
            lay_in_c2c: String::new(),
            thickness: String::new(),
            shave: false,
            job_name: String::new(),
            status: "Fill in the form and press Enter.".to_string(),
            output: None,
        };
        let end_type = app.default_type(PREFERRED_END_TYPE);
        for slot in [Slot::A, Slot::LayIn, Slot::B] {
            app.set_type(slot, end_type.clone());
        }
        let bushing_type = app.default_type(DEFAULT_BUSHING_TYPE);
        app.set_type(Slot::Bushing, bushing_type);
        app
    }

    fn kind(&self) -> CutKind {
        CutKind::ALL[self.tab]
    }

    fn fields(&self) -> Vec<Field> {
        fields(self.kind())
    }

    fn current_field(&self) -> Field {
        let fields = self.fields();
        fields[self.selected_field.min(fields.len() - 1)]
    }

    fn default_type(&self, preferred: &str) -> String {
        if self.type_choices.iter().any(|t| t == preferred) {
            return preferred.to_string();
        }
        self.type_choices.first().cloned().unwrap_or_default()
    }

    fn slot(&self, slot: Slot) -> &Selection {
        match slot {
            Slot::A => &self.a,
            Slot::LayIn => &self.lay_in,
            Slot::Bushing => &self.bushing,
            Slot::B => &self.b,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Selection {
        match slot {
            Slot::A => &mut self.a,
            Slot::LayIn => &mut self.lay_in,
            Slot::Bushing => &mut self.bushing,
            Slot::B => &mut self.b,
        }
    }

    /// Change a slot's type and reset its size to the first available one.
    fn set_type(&mut self, slot: Slot, fitting_type: String) {
        let size = self
            .workspace
            .catalog
            .sizes(&fitting_type)
            .into_iter()
            .next()
            .unwrap_or_default();
        let sel = self.slot_mut(slot);
        sel.fitting_type = fitting_type;
        sel.size = size;
    }

    fn measure_mut(&mut self, measure: Measure) -> &mut String {
        match measure {
            Measure::C2c => &mut self.c2c,
            Measure::Overall => &mut self.overall,
            Measure::LayIn => &mut self.lay_in_c2c,
            Measure::Thickness => &mut self.thickness,
        }
    }

    fn measure(&self, measure: Measure) -> &str {
        match measure {
            Measure::C2c => &self.c2c,
            Measure::Overall => &self.overall,
            Measure::LayIn => &self.lay_in_c2c,
            Measure::Thickness => &self.thickness,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
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

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let field = self.current_field();
        match code {
            KeyCode::Esc => return true,
            KeyCode::Tab => self.switch_tab(1),
            KeyCode::BackTab => self.switch_tab(CutKind::ALL.len() - 1),
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.fields().len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(field, -1),
            KeyCode::Right => self.adjust_field(field, 1),
            KeyCode::Enter => self.compute(),
            KeyCode::F(2) => self.save_to_job(),
            KeyCode::Backspace => match field {
                Field::Measure(m) => {
                    self.measure_mut(m).pop();
                }
                Field::Job => {
                    self.job_name.pop();
                }
                _ => {}
            },
            KeyCode::Char(c) => match field {
                Field::Measure(m) => {
                    if c.is_ascii_digit() || matches!(c, '.' | '/' | ' ' | '"') {
                        self.measure_mut(m).push(c);
                    }
                }
                Field::Job => self.job_name.push(c),
                Field::Shave | Field::Alt(_) if c == ' ' => self.adjust_field(field, 1),
                _ => {}
            },
            _ => {}
        }
        false
    }

    fn switch_tab(&mut self, step: usize) {
        self.tab = (self.tab + step) % CutKind::ALL.len();
        self.selected_field = 0;
        self.output = None;
        self.status = self.kind().display_name().to_string();
    }

    fn adjust_field(&mut self, field: Field, delta: i32) {
        match field {
            Field::Type(slot) => {
                let current = &self.slot(slot).fitting_type;
                let idx = self.type_choices.iter().position(|t| t == current);
                if let Some(next) = cycle(idx, self.type_choices.len(), delta) {
                    let t = self.type_choices[next].clone();
                    self.set_type(slot, t);
                }
            }
            Field::Size(slot) => {
                let sel = self.slot(slot);
                let sizes = self.workspace.catalog.sizes(&sel.fitting_type);
                let idx = sizes.iter().position(|s| *s == sel.size);
                match cycle(idx, sizes.len(), delta) {
                    Some(next) => self.slot_mut(slot).size = sizes[next].clone(),
                    None => self.status = format!("No catalog sizes for '{}'.", sel.fitting_type),
                }
            }
            Field::Alt(slot) => {
                let sel = self.slot_mut(slot);
                sel.alt = !sel.alt;
            }
            Field::Shave => self.shave = !self.shave,
            Field::Measure(_) | Field::Job => {}
        }
    }

    fn build_input(&self) -> Result<CalcInput, CutError> {
        let input = match self.kind() {
            CutKind::Standard => CalcInput::Standard {
                a: self.a.spec(),
                b: self.b.spec(),
                c2c: parse_measurement(Measure::C2c.label(), &self.c2c)?,
            },
            CutKind::LayIn => CalcInput::LayIn {
                a: self.a.spec(),
                lay_in: self.lay_in.spec(),
                b: self.b.spec(),
                c2c_overall: parse_measurement(Measure::Overall.label(), &self.overall)?,
                c2c_lay_in: parse_measurement(Measure::LayIn.label(), &self.lay_in_c2c)?,
            },
            CutKind::Bushing => CalcInput::Bushing {
                a: self.a.spec(),
                bushing: FittingSpec::new(&self.bushing.fitting_type, &self.bushing.size),
                b: self.b.spec(),
                c2c: parse_measurement(Measure::C2c.label(), &self.c2c)?,
                thickness: match self.thickness.trim() {
                    "" => None,
                    raw => Some(parse_measurement(Measure::Thickness.label(), raw)?),
                },
            },
        };
        Ok(input)
    }

    fn compute(&mut self) {
        let outcome = self
            .build_input()
            .and_then(|input| run_calculation(&self.workspace.resolver(), &input, self.shave));
        match outcome {
            Ok(output) => {
                self.status = "Calculated.".to_string();
                self.output = Some(output);
            }
            Err(err) => {
                self.status = err.to_string();
                self.output = None;
            }
        }
    }

    fn save_to_job(&mut self) {
        let Some(output) = &self.output else {
            self.status = "Nothing to save; press Enter to calculate first.".to_string();
            return;
        };
        let name = self.job_name.trim();
        if name.is_empty() {
            self.status = "Enter a job name first.".to_string();
            return;
        }
        let saved = read_job_book(&self.jobs_path).and_then(|mut book| {
            let count = book.record(name, job_entry(output)).entries.len();
            write_job_book(&self.jobs_path, &book).map(|_| count)
        });
        self.status = match saved {
            Ok(count) => format!("Saved to job '{name}' ({count} entries)."),
            Err(err) => format!("Save failed: {err}"),
        };
    }

    fn field_text(&self, field: Field) -> String {
        match field {
            Field::Type(slot) => format!("{} type: {}", slot.label(), self.slot(slot).fitting_type),
            Field::Size(slot) => {
                let size = &self.slot(slot).size;
                let size = if size.is_empty() { "-" } else { size };
                format!("{} size: {size}", slot.label())
            }
            Field::Alt(slot) => format!(
                "{} offset: {}",
                slot.label(),
                if self.slot(slot).alt { "alternate" } else { "primary" }
            ),
            Field::Measure(m) => {
                let hint = if m == Measure::Thickness { " (blank = catalog)" } else { "" };
                format!("{}: {}{hint}", m.label(), self.measure(m))
            }
            Field::Shave => format!("Shave 1/16: {}", if self.shave { "yes" } else { "no" }),
            Field::Job => format!("Job: {}", self.job_name),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_tabs(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<&str> = CutKind::ALL.iter().map(|k| k.display_name()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab)
            .block(Block::default().title("cut").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .fields()
            .into_iter()
            .map(|f| {
                let style = if f.is_text() {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(self.field_text(f)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Result").borders(Borders::ALL);
        let Some(output) = &self.output else {
            let msg = Paragraph::new("Press Enter to calculate.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let mut lines: Vec<Line> = format_request(&output.request)
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Gray))))
            .collect();
        lines.push(Line::from(""));
        for cut in render_result(&output.result) {
            let color = if cut.negative { Color::Red } else { Color::Green };
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", cut.label)),
                Span::styled(
                    format!("{}\"  {}\"", cut.decimal, cut.fraction),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        if output.shaved {
            lines.push(Line::from(Span::styled("(shaved 1/16)", Style::default().fg(Color::Gray))));
        }

        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab kind  ↑/↓ field  ←/→ choose  Enter calculate  F2 save to job  Esc quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Step through `len` choices, wrapping; an unknown position starts at 0.
fn cycle(current: Option<usize>, len: usize, delta: i32) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(idx) = current else {
        return Some(0);
    };
    let next = if delta >= 0 { (idx + 1) % len } else { (idx + len - 1) % len };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogEntry, SessionOverrides};
    use crate::domain::CatalogConfig;
    use num_rational::Ratio;

    fn app() -> App {
        let row = |t: &str, s: &str, p: &str| CatalogEntry::new(t, s, Some(p.to_string()), None);
        let workspace = Workspace {
            catalog: Catalog::from_entries(vec![
                row(PREFERRED_END_TYPE, "1.5", "0.6875"),
                row(PREFERRED_END_TYPE, "2", "0.75"),
                row("Tee (Reducing)", "2x2x1", "0.5"),
            ]),
            config: CatalogConfig::default(),
            overrides: SessionOverrides::new(),
        };
        App::new(workspace, PathBuf::from("unused.json"))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn select(app: &mut App, field: Field) {
        app.selected_field = app.fields().iter().position(|f| *f == field).unwrap();
    }

    #[test]
    fn starts_on_first_catalog_size() {
        let app = app();
        assert_eq!(app.a.fitting_type, PREFERRED_END_TYPE);
        assert_eq!(app.a.size, "1.5");
        assert_eq!(app.bushing.size, "");
    }

    #[test]
    fn standard_tab_computes_through_pipeline() {
        let mut app = app();
        select(&mut app, Field::Size(Slot::A));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.a.size, "2");

        select(&mut app, Field::Measure(Measure::C2c));
        type_text(&mut app, "12");
        app.handle_key(KeyCode::Enter);

        let output = app.output.as_ref().unwrap();
        assert_eq!(output.result.lengths[0].value, Ratio::new(169, 16));
        assert_eq!(app.status, "Calculated.");
    }

    #[test]
    fn errors_land_in_the_status_line() {
        let mut app = app();
        select(&mut app, Field::Measure(Measure::C2c));
        type_text(&mut app, "1/0");
        app.handle_key(KeyCode::Enter);
        assert!(app.output.is_none());
        assert!(app.status.contains("1/0"));
    }

    #[test]
    fn tabs_wrap_and_reset_selection() {
        let mut app = app();
        app.selected_field = 3;
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.kind(), CutKind::Bushing);
        assert_eq!(app.selected_field, 0);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.kind(), CutKind::Standard);
    }

    #[test]
    fn cycling_type_resets_size() {
        let mut app = app();
        select(&mut app, Field::Type(Slot::B));
        app.handle_key(KeyCode::Left);
        // Preferred type is fourth in the default list; one step back is the bushing.
        assert_eq!(app.b.fitting_type, DEFAULT_BUSHING_TYPE);
        assert_eq!(app.b.size, "");
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(cycle(Some(0), 3, -1), Some(2));
        assert_eq!(cycle(Some(2), 3, 1), Some(0));
        assert_eq!(cycle(None, 3, 1), Some(0));
        assert_eq!(cycle(Some(0), 0, 1), None);
    }
}
