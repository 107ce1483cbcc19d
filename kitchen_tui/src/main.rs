use anyhow::{Context, Result};
use clap::Parser;
use kitchen_core::{
    Composition, Decision, DecisionEngine, Ingredient, Kitchen, KitchenView, PlanError, Position,
    Snapshot, Station,
    kitchen::Tile,
    protocol::ProtocolReader,
};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, BufReader, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about = "Replay a recorded referee transcript through the decision engine", long_about = None)]
struct Args {
    /// Transcript of referee input to replay
    #[arg(short, long, value_name = "FILE", default_value = "transcripts/sample.txt")]
    transcript: PathBuf,

    /// Milliseconds between turns
    #[arg(long, value_name = "MS", default_value_t = 250)]
    tick_ms: u64,
}

struct App {
    kitchen: Kitchen,
    turns: Vec<Snapshot>,
    engine: DecisionEngine,
    /// Index of the turn on screen.
    current: usize,
    decision: Result<Decision, PlanError>,
    paused: bool,
    should_quit: bool,
}

impl App {
    fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
        let mut reader = ProtocolReader::new(BufReader::new(file));
        let header = reader.read_header().context("Reading transcript header")?;
        let mut turns = Vec::new();
        while let Some(turn) = reader.read_turn(&header.kitchen)? {
            turns.push(turn);
        }
        if turns.is_empty() {
            anyhow::bail!("Transcript {} contains no turns", path.display());
        }

        let engine = DecisionEngine::default();
        let decision = engine.decide(KitchenView::new(&header.kitchen, &turns[0]));
        Ok(App {
            kitchen: header.kitchen,
            turns,
            engine,
            current: 0,
            decision,
            paused: false,
            should_quit: false,
        })
    }

    fn snapshot(&self) -> &Snapshot {
        &self.turns[self.current]
    }

    /// Advances to the next recorded turn and re-runs the engine on it.
    fn tick(&mut self) {
        if self.paused || self.current + 1 >= self.turns.len() {
            return;
        }
        self.current += 1;
        self.decision = self
            .engine
            .decide(KitchenView::new(&self.kitchen, &self.turns[self.current]));
    }

    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !args.transcript.exists() {
        return Err(anyhow::anyhow!(
            "Transcript file does not exist: {}",
            args.transcript.display()
        ));
    }

    // Load before touching the terminal so errors print normally.
    let mut app = App::load(&args.transcript)?;

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(args.tick_ms));
    restore_terminal(&mut terminal)?;
    result
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char(' ') => app.paused = !app.paused,
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(frame.area());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[0]);

    render_kitchen(frame, top[0], app);
    render_status(frame, top[1], app);
    render_decision(frame, rows[1], app);

    let help = if app.paused {
        "Paused. Space to resume, 'q' or 'Esc' to quit."
    } else {
        "Space to pause, 'q' or 'Esc' to quit."
    };
    let help_text = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, rows[2]);
}

/// One-character glyph for what sits on a counter.
fn item_glyph(items: &Composition) -> &'static str {
    let mut iter = items.iter();
    match (iter.next(), iter.next()) {
        (Some(single), None) => match single {
            Ingredient::Dish => "d",
            Ingredient::IceCream => "i",
            Ingredient::Blueberries => "b",
            Ingredient::Strawberries => "s",
            Ingredient::ChoppedStrawberries => "c",
            Ingredient::Dough => "h",
            Ingredient::ChoppedDough => "x",
            Ingredient::RawTart => "r",
            Ingredient::Croissant => "o",
            Ingredient::Tart => "t",
        },
        (Some(_), Some(_)) => "*",
        _ => "#",
    }
}

fn station_style(station: Station) -> Style {
    match station {
        Station::Window => Style::default().fg(Color::Green).bold(),
        Station::Oven => Style::default().fg(Color::Red),
        Station::Dishwasher => Style::default().fg(Color::White).bold(),
        _ => Style::default().fg(Color::Cyan),
    }
}

fn render_kitchen(frame: &mut Frame, area: Rect, app: &App) {
    let kitchen = &app.kitchen;
    let snapshot = app.snapshot();
    let target = app.decision.as_ref().ok().and_then(|d| d.command.target());

    let mut lines: Vec<Line> = Vec::with_capacity(kitchen.height());
    for y in 0..kitchen.height() {
        let mut spans: Vec<Span> = Vec::with_capacity(kitchen.width());
        for x in 0..kitchen.width() {
            let position = Position::new(x, y);
            let chef = snapshot
                .chefs
                .iter()
                .position(|chef| chef.position == position);

            let mut span = if let Some(index) = chef {
                let color = if index == 0 { Color::Yellow } else { Color::Magenta };
                Span::styled(index.to_string(), Style::default().fg(color).bold())
            } else {
                match kitchen.tile(position).unwrap_or(Tile::Floor) {
                    Tile::Floor => Span::raw(" "),
                    Tile::Counter => match snapshot.counter(position) {
                        Some(items) => {
                            Span::styled(item_glyph(items), Style::default().fg(Color::Yellow))
                        }
                        None => Span::styled("#", Style::default().fg(Color::DarkGray)),
                    },
                    Tile::Station(station) => {
                        Span::styled(station.code().to_string(), station_style(station))
                    }
                }
            };
            if target == Some(position) {
                span = span.on_blue();
            }
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Kitchen").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(map_paragraph, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.snapshot();
    let mut items: Vec<ListItem> = vec![
        ListItem::new(format!(
            "Turn {}/{}  ({} remaining)",
            app.current + 1,
            app.turns.len(),
            snapshot.turns_remaining
        )),
        ListItem::new(format!(
            "Oven: {} (timer {})",
            snapshot.oven.contents, snapshot.oven.timer
        )),
    ];
    for (index, chef) in snapshot.chefs.iter().enumerate() {
        items.push(ListItem::new(format!(
            "Chef {index} at ({}, {}) holding {}",
            chef.position.x, chef.position.y, chef.items
        )));
    }
    items.push(ListItem::new(Line::from(Span::styled(
        "Waiting orders",
        Style::default().bold(),
    ))));
    for order in &snapshot.orders {
        items.push(ListItem::new(format!("  {:>5}  {}", order.reward, order.items)));
    }

    let status = List::new(items).block(Block::default().borders(Borders::ALL).title("State"));
    frame.render_widget(status, area);
}

fn render_decision(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.decision {
        Ok(decision) => Line::from(vec![
            Span::styled(format!("[{}] ", decision.rule), Style::default().fg(Color::Cyan)),
            Span::raw(decision.command.to_string()),
        ]),
        Err(err) => Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
    };
    let widget =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Decision"));
    frame.render_widget(widget, area);
}
