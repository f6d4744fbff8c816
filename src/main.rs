use std::fs::{self, OpenOptions};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use evcal::app::{App, Focus, InputMode, StatusLevel};
use evcal::config;
use evcal::infrastructure::{ApiClient, RuntimeBridge, RuntimeCommand, RuntimeEvent};
use evcal::store::TokenStore;
use evcal::ui;
use evcal::ui::layout::{self, UiAreas};
use evcal::ui::tabs::TabClick;

#[derive(Debug, Parser)]
#[command(
    name = "evcal",
    version,
    about = "Event calendar in the terminal: tabs, menu and an events API client"
)]
struct Args {
    /// Events API base URL (e.g. http://localhost:8080)
    #[arg(long)]
    base_url: Option<String>,

    /// OAuth client id used for login
    #[arg(long)]
    client_id: Option<String>,

    /// OAuth client secret used for login
    #[arg(long)]
    client_secret: Option<String>,

    /// Initial location (e.g. /events)
    #[arg(long, default_value = "/")]
    path: String,

    /// Skip the automatic login at startup
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = config::load();
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    if let Some(client_id) = args.client_id {
        config.api.client_id = client_id;
    }
    if let Some(client_secret) = args.client_secret {
        config.api.client_secret = client_secret;
    }
    info!(base_url = %config.api.base_url, offline = args.offline, "starting");

    let mut app = App::new(&args.path, config.clone());
    app.offline = args.offline;

    let tokens = match open_token_store() {
        Ok(store) => store,
        Err(err) => {
            warn!("token store unavailable: {err:#}");
            app.set_status(
                format!("Token store disabled: {err}"),
                StatusLevel::Warn,
            );
            TokenStore::open_in_memory()?
        }
    };
    let api = ApiClient::new(config.api.clone(), tokens)?;
    let runtime = RuntimeBridge::new(Arc::new(api), !args.offline)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

/// Logs go to a file in the data dir; the terminal belongs to the TUI.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file = config::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}

fn open_token_store() -> Result<TokenStore> {
    let path = config::token_db_path().context("no data directory for the token store")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create data dir {}", parent.display()))?;
    }
    TokenStore::open(&path)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

/// Apply worker events to the app, then hand the app's requests to the worker
fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::Session { authenticated } => app.apply_session(authenticated),
            RuntimeEvent::AuthenticationFailed { message } => {
                app.apply_authentication_failed(message)
            }
            RuntimeEvent::EventsLoaded { query, page } => app.apply_events_loaded(query, page),
            RuntimeEvent::EventsFailed { query, error } => app.apply_events_failed(query, error),
            RuntimeEvent::EventCreated { event } => app.apply_event_created(event),
            RuntimeEvent::CreateFailed { error } => app.apply_create_failed(error),
            RuntimeEvent::Error { message } => app.set_status(message, StatusLevel::Error),
        }
    }

    let mut commands = Vec::new();
    if app.take_logout_request() {
        commands.push(RuntimeCommand::Logout);
    }
    if app.take_login_request() {
        commands.push(RuntimeCommand::Login);
    }
    if let Some(query) = app.take_fetch_request() {
        commands.push(RuntimeCommand::FetchEvents { query });
    }
    if let Some(event) = app.take_create_request() {
        commands.push(RuntimeCommand::CreateEvent { event });
    }
    for cmd in commands {
        if let Err(err) = runtime.send(cmd) {
            app.set_status(format!("Worker unavailable: {err}"), StatusLevel::Error);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    if app.form.is_some() {
        app.handle_form_key(key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(None),
        KeyCode::Char('g') => app.enter_command(Some("goto /".to_string())),
        KeyCode::Char('L') => app.toggle_session(),
        KeyCode::Char('[') => app.cycle_tab(false),
        KeyCode::Char(']') => app.cycle_tab(true),
        KeyCode::Char('x') => app.close_active_tab(),
        KeyCode::Char('X') => app.close_other_tabs(),
        KeyCode::Backspace => app.go_back(),
        KeyCode::Tab => cycle_focus(app),
        KeyCode::Char('h') => app.focus = Focus::Menu,
        KeyCode::Char('l') => app.focus = Focus::Content,
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(entry) = app.menu_items().get(index).copied() {
                app.open_view(entry.id);
            }
        }
        _ => match app.focus {
            Focus::Menu => handle_menu_key(app, key),
            Focus::Content => app.handle_content_key(key),
        },
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_menu_selection(true),
        KeyCode::Char('k') | KeyCode::Up => app.move_menu_selection(false),
        KeyCode::Enter => app.open_selected_menu_item(),
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn cycle_focus(app: &mut App) {
    app.focus = match app.focus {
        Focus::Menu => Focus::Content,
        Focus::Content => Focus::Menu,
    };
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help_open || app.form.is_some() || app.input_mode == InputMode::Command {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = layout::areas(size);
    let col = mouse.column;
    let row = mouse.row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_click(app, areas, col, row),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
            if layout::contains(areas.content, col, row) =>
        {
            let code = if mouse.kind == MouseEventKind::ScrollUp {
                KeyCode::Up
            } else {
                KeyCode::Down
            };
            app.handle_content_key(KeyEvent::new(code, KeyModifiers::NONE));
        }
        _ => {}
    }
}

fn handle_click(app: &mut App, areas: UiAreas, col: u16, row: u16) {
    if layout::contains(areas.header_button, col, row) {
        app.toggle_session();
        return;
    }

    if layout::contains(areas.sidebar, col, row) {
        let inner = layout::inner(areas.sidebar);
        if !layout::contains(inner, col, row) {
            return;
        }
        let idx = (row - inner.y) as usize;
        if idx < app.menu_items().len() {
            app.menu_selected = idx;
            app.focus = Focus::Menu;
            app.open_selected_menu_item();
        }
        return;
    }

    if layout::contains(areas.tab_bar, col, row) {
        match ui::tabs::click_at(app, layout::inner(areas.tab_bar), col) {
            Some(TabClick::Activate(id)) => app.activate_tab(id),
            Some(TabClick::Close(id)) => app.close_tab(id),
            None => {}
        }
        return;
    }

    if layout::contains(areas.content, col, row) {
        app.focus = Focus::Content;
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}
