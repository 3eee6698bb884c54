mod api;
mod app;
mod config;
mod event;
mod quiz;
mod session;
mod speech;
mod store;
mod ui;
mod vocab;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::LevelFilter;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use app::{App, AppScreen, SETTINGS_FIELDS, VocabField};
use api::user_store::Field;
use config::Config;
use event::{AppEvent, EventHandler};
use session::challenge::Phase;
use session::dictation::DictationPhase;
use store::LocalStorage;
use store::check_in::CheckIns;
use store::custom_vocab::CustomVocabularies;
use store::schema::ExportData;
use ui::components::dashboard::Dashboard;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::{QuestionCard, option_index};
use ui::components::week_strip::{WeekStrip, day_count, week_strip_text};
use ui::components::word_list::WordList;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::line_input::LineInput;
use vocab::WordStatus;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "vocabdr", version, about = "Terminal vocabulary trainer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Record today's study and print this week's check-ins
    CheckIn,
    /// Create a custom vocabulary from a text file of `word,meaning` lines
    ImportWords {
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        emoji: String,
        /// Also upload the words to the configured server
        #[arg(long)]
        remote: bool,
    },
    /// Write all local data to a JSON backup
    Export { file: PathBuf },
    /// Replace local data with a JSON backup
    Import { file: PathBuf },
}

fn setup_logging(verbose: u8, log_file: Option<&Path>) {
    let log_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, log_level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });
    // the terminal belongs to the UI, so TUI runs log to a file
    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("cannot open log file {}: {e}", path.display()),
        }
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let storage = LocalStorage::new()?;
    let log_file = cli
        .command
        .is_none()
        .then(|| storage.base_dir().join("vocabdr.log"));
    setup_logging(cli.verbose, log_file.as_deref());

    if storage.check_interrupted_import() {
        log::warn!("cleaned up after an interrupted import");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("failed to load config, using defaults: {e}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    rust_i18n::set_locale(&config.language);

    match cli.command {
        Some(Command::CheckIn) => run_check_in(storage),
        Some(Command::ImportWords {
            file,
            name,
            emoji,
            remote,
        }) => run_import_words(storage, &config, &file, &name, &emoji, remote),
        Some(Command::Export { file }) => run_export(&storage, &file),
        Some(Command::Import { file }) => run_import(&storage, &file),
        None => run_tui(config, storage),
    }
}

fn run_check_in(storage: LocalStorage) -> Result<()> {
    let check_ins = CheckIns::new(storage);
    let today = App::today();
    if check_ins.check_in(today)? {
        println!("{}", t!("cli.checked_in", date = today));
    } else {
        println!("{}", t!("cli.already_checked_in", date = today));
    }
    println!("{}", week_strip_text(check_ins.week_status(today), today));
    println!(
        "{}",
        t!(
            "check_in.summary",
            streak = day_count(check_ins.current_streak(today) as usize),
            total = day_count(check_ins.total_days())
        )
    );
    Ok(())
}

fn run_import_words(
    storage: LocalStorage,
    config: &Config,
    file: &Path,
    name: &str,
    emoji: &str,
    remote: bool,
) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let vocabs = CustomVocabularies::new(storage.clone());
    let (vocab, issues) = vocabs.create(name, emoji, &text)?;
    for issue in &issues {
        eprintln!(
            "{}",
            t!("cli.skipped_line", line = issue.line, content = issue.content)
        );
    }
    println!(
        "{}",
        t!(
            "cli.created",
            name = vocab.name,
            count = vocab.words.len(),
            id = vocab.id
        )
    );

    if remote {
        let url = config
            .api_base_url
            .as_deref()
            .context("api_base_url is not set in config.toml")?;
        let mut remote = app::Remote::connect(url, storage);
        let category = remote
            .custom
            .create(&vocab.name, &vocab.emoji)
            .context("server rejected the new category")?;
        if remote.custom.add_words(category.id, &vocab.words) {
            println!("{}", t!("cli.uploaded", id = category.id));
        } else {
            anyhow::bail!("server rejected the words");
        }
    }
    Ok(())
}

fn run_export(storage: &LocalStorage, file: &Path) -> Result<()> {
    let data = storage.export_all();
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(file, json).with_context(|| format!("failed to write {}", file.display()))?;
    println!(
        "{}",
        t!("cli.exported", count = data.entries.len(), file = file.display())
    );
    Ok(())
}

fn run_import(storage: &LocalStorage, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let data: ExportData = serde_json::from_str(&content).context("not a vocabdr backup")?;
    storage.import_all(&data)?;
    println!(
        "{}",
        t!("cli.imported", count = data.entries.len(), file = file.display())
    );
    Ok(())
}

fn run_tui(config: Config, storage: LocalStorage) -> Result<()> {
    let mut app = App::new(config, storage);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // the challenge countdown moves once per tick
    let events = EventHandler::new(Duration::from_secs(1));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = app.config.save() {
        log::error!("failed to save config: {e}");
    }
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                if let Err(e) = handle_key(app, key) {
                    log::error!("{e:#}");
                    app.set_status(t!("status.error", error = e));
                }
            }
            AppEvent::Tick => {
                if app.screen == AppScreen::Challenge {
                    app.challenge_tick();
                }
            }
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }
    app.status_message = None;

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::BookSelect => handle_book_select_key(app, key)?,
        AppScreen::CreateVocab => app.handle_vocab_form(key)?,
        AppScreen::WordList => handle_word_list_key(app, key),
        AppScreen::Flashcard => handle_flashcard_key(app, key),
        AppScreen::Dictation => handle_dictation_key(app, key),
        AppScreen::Challenge => handle_challenge_key(app, key),
        AppScreen::ChallengeResult => handle_result_key(app, key),
        AppScreen::Mistakes => handle_mistakes_key(app, key)?,
        AppScreen::CheckIn => handle_check_in_key(app, key)?,
        AppScreen::Settings => handle_settings_key(app, key)?,
        AppScreen::Login => app.handle_login_form(key),
    }
    Ok(())
}

fn activate_menu_entry(app: &mut App, key: &str) {
    match key {
        "1" => app.screen = AppScreen::WordList,
        "2" => app.start_flashcards(),
        "3" => app.start_dictation(),
        "4" => app.start_challenge(),
        "b" => app.go_to_book_select(),
        "m" => app.go_to_mistakes(),
        "c" => app.go_to_check_in(),
        "s" => app.go_to_settings(),
        _ => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(entry) = app.menu.selected_key().map(str::to_string) {
                activate_menu_entry(app, &entry);
            }
        }
        KeyCode::Char(ch) => activate_menu_entry(app, &ch.to_string()),
        _ => {}
    }
}

fn handle_book_select_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.source_selected = app.source_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.source_selected + 1 < app.sources.len() {
                app.source_selected += 1;
            }
        }
        KeyCode::Enter => app.select_source(),
        KeyCode::Char('n') => app.start_create_vocab(),
        KeyCode::Char('x') | KeyCode::Delete => app.delete_selected_source()?,
        _ => {}
    }
    Ok(())
}

fn handle_word_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.list_move(false),
        KeyCode::Down | KeyCode::Char('j') => app.list_move(true),
        KeyCode::Char('y') => app.mark_selected(WordStatus::Known),
        KeyCode::Char('n') => app.mark_selected(WordStatus::Unknown),
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('h') => app.hide_meanings = !app.hide_meanings,
        KeyCode::Char('p') | KeyCode::Enter => {
            let word = app
                .visible_words()
                .get(app.list_selected)
                .map(|w| w.word.clone());
            if let Some(word) = word {
                app.speak(&word);
            }
        }
        _ => {}
    }
}

fn handle_flashcard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(s) = app.flashcard.as_mut() {
                s.flip();
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(s) = app.flashcard.as_mut() {
                s.next();
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(s) = app.flashcard.as_mut() {
                s.prev();
            }
        }
        KeyCode::Char('y') => app.flashcard_mark(WordStatus::Known),
        KeyCode::Char('n') => app.flashcard_mark(WordStatus::Unknown),
        KeyCode::Char('p') => {
            let word = app
                .flashcard
                .as_ref()
                .and_then(|s| s.current())
                .map(|w| w.word.clone());
            if let Some(word) = word {
                app.speak(&word);
            }
        }
        _ => {}
    }
}

fn handle_dictation_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => app.dictation_submit(),
        KeyCode::Tab => app.speak_dictation_word(),
        KeyCode::Backspace => {
            if let Some(s) = app.dictation.as_mut() {
                s.backspace();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(s) = app.dictation.as_mut() {
                s.push_char(ch);
            }
        }
        _ => {}
    }
}

fn handle_challenge_key(app: &mut App, key: KeyEvent) {
    let phase = app.challenge.as_ref().map(|c| c.phase());
    match (key.code, phase) {
        (KeyCode::Esc, _) => app.go_to_menu(),
        (KeyCode::Char(ch), Some(Phase::Answering)) => {
            if let Some(idx) = option_index(ch) {
                app.challenge_select(idx);
            }
        }
        (KeyCode::Enter | KeyCode::Char(' '), Some(Phase::Answered(_))) => app.challenge_next(),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_challenge(),
        KeyCode::Char('m') => app.go_to_mistakes(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_mistakes_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.mistakes_selected = app.mistakes_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.mistakes_selected + 1 < app.mistake_rows.len() {
                app.mistakes_selected += 1;
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => app.delete_selected_mistake()?,
        KeyCode::Char('C') => app.clear_mistakes()?,
        KeyCode::Char('p') => {
            if app.mistake_rows.is_empty() {
                app.set_status(t!("status.no_mistakes"));
            } else {
                app.practice_mistakes();
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_check_in_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Enter | KeyCode::Char(' ') => app.check_in_today()?,
        _ => {}
    }
    Ok(())
}

fn handle_settings_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.config.save()?;
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_FIELDS {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true)?,
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false)?,
        KeyCode::Char('a') => {
            if app.signed_in_as().is_some() {
                app.logout();
            } else {
                app.go_to_login();
            }
        }
        _ => {}
    }
    Ok(())
}

// ---- rendering ----

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::BookSelect => render_book_select(frame, app),
        AppScreen::CreateVocab => render_create_vocab(frame, app),
        AppScreen::WordList => render_word_list(frame, app),
        AppScreen::Flashcard => render_flashcard(frame, app),
        AppScreen::Dictation => render_dictation(frame, app),
        AppScreen::Challenge => render_challenge(frame, app),
        AppScreen::ChallengeResult => render_result(frame, app),
        AppScreen::Mistakes => render_mistakes(frame, app),
        AppScreen::CheckIn => render_check_in(frame, app),
        AppScreen::Settings => render_settings(frame, app),
        AppScreen::Login => render_login(frame, app),
    }
}

/// Header bar, footer hints, and the status line. Returns the body area.
fn render_frame(frame: &mut ratatui::Frame, app: &App, title: &str, hints: &[Cow<str>]) -> Rect {
    let area = frame.area();
    let colors = &app.theme.colors;
    let hints: Vec<&str> = hints.iter().map(|h| h.as_ref()).collect();
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16 + 1);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vocabdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {title} | {} ", app.source_name),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let mut footer: Vec<Line> = vec![Line::from(Span::styled(
        app.status_message.clone().unwrap_or_default(),
        Style::default().fg(colors.highlight()),
    ))];
    footer.extend(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted())))),
    );
    frame.render_widget(Paragraph::new(footer), layout.footer);

    layout.main
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let today = App::today();
    let checked = if app.check_ins.has_checked_in(today) {
        t!("title.checked_in")
    } else {
        t!("title.not_checked_in")
    };
    let title = t!(
        "title.menu",
        words = app.words.len(),
        streak = app.check_ins.current_streak(today),
        checked = checked
    );
    let main = render_frame(
        frame,
        app,
        &title,
        &[
            t!("hint.start"),
            t!("hint.books"),
            t!("hint.mistakes"),
            t!("hint.check_in"),
            t!("hint.settings"),
            t!("hint.quit"),
        ],
    );
    let menu_area = centered_rect(50, 90, main);
    frame.render_widget(&app.menu, menu_area);
}

fn render_book_select(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.books"),
        &[
            t!("hint.study"),
            t!("hint.new_vocab"),
            t!("hint.delete_custom"),
            t!("hint.back"),
        ],
    );
    let colors = &app.theme.colors;
    let block = Block::bordered()
        .title(format!(" {} ", t!("title.choose_book")))
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(main);
    block.render(main, frame.buffer_mut());

    let rows = (inner.height / 2).max(1) as usize;
    let offset = ui::components::word_list::scroll_offset(app.source_selected, rows);
    let mut lines = Vec::new();
    let active_marker = t!("title.active");
    for (i, entry) in app.sources.iter().enumerate().skip(offset).take(rows) {
        let selected = i == app.source_selected;
        let active = entry.source == app.source;
        let style = if selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        lines.push(Line::from(Span::styled(
            format!(
                " {} {}{}",
                if selected { ">" } else { " " },
                entry.label,
                if active {
                    format!("  {active_marker}")
                } else {
                    String::new()
                }
            ),
            style,
        )));
        lines.push(Line::from(Span::styled(
            format!("     {}", entry.detail),
            Style::default().fg(colors.muted()),
        )));
    }
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn input_block<'a>(app: &App, title: &str, focused: bool) -> Block<'a> {
    let colors = &app.theme.colors;
    Block::bordered().title(format!(" {title} ")).border_style(Style::default().fg(if focused {
        colors.border_focused()
    } else {
        colors.border()
    }))
}

fn render_input(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str, input: &LineInput, focused: bool) {
    let block = input_block(app, title, focused);
    let text = input.display(focused.then_some('▏'));
    Paragraph::new(text)
        .style(Style::default().fg(app.theme.colors.fg()))
        .wrap(Wrap { trim: false })
        .block(block)
        .render(area, frame.buffer_mut());
}

fn render_create_vocab(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.new_vocab"),
        &[
            t!("hint.next_field"),
            t!("hint.new_line"),
            t!("hint.create"),
            t!("hint.cancel"),
        ],
    );
    let Some(form) = app.vocab_form.as_ref() else {
        return;
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(centered_rect(70, 90, main));
    render_input(frame, app, layout[0], &t!("form.name"), &form.name, form.focus == VocabField::Name);
    render_input(frame, app, layout[1], &t!("form.emoji"), &form.emoji, form.focus == VocabField::Emoji);
    render_input(
        frame,
        app,
        layout[2],
        &t!("form.words"),
        &form.words,
        form.focus == VocabField::Words,
    );
}

fn render_word_list(frame: &mut ratatui::Frame, app: &App) {
    let filter = match app.word_filter {
        None => t!("word_list.all"),
        Some(WordStatus::Known) => t!("word_list.known"),
        Some(WordStatus::Unknown) => t!("word_list.unknown"),
        Some(WordStatus::Unmarked) => t!("word_list.unmarked"),
    };
    let main = render_frame(
        frame,
        app,
        &t!("title.word_list"),
        &[
            t!("hint.known"),
            t!("hint.unknown"),
            t!("hint.filter"),
            t!("hint.hide"),
            t!("hint.speak"),
            t!("hint.back"),
        ],
    );
    let words = app.visible_words();
    let title = t!(
        "word_list.summary",
        source = app.source_name,
        filter = filter,
        count = words.len(),
        known = app.words.iter().filter(|w| w.status == WordStatus::Known).count(),
        unknown = app.words.iter().filter(|w| w.status == WordStatus::Unknown).count()
    )
    .to_string();
    let list = WordList::new(title, &words, app.list_selected, app.theme).hide_meaning(app.hide_meanings);
    frame.render_widget(list, main);
}

fn render_flashcard(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.flashcards"),
        &[
            t!("hint.flip"),
            t!("hint.prev_next"),
            t!("hint.known"),
            t!("hint.unknown"),
            t!("hint.speak"),
            t!("hint.back"),
        ],
    );
    let Some(session) = app.flashcard.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let (pos, total) = session.progress();
    let card_area = centered_rect(60, 60, main);
    let block = Block::bordered()
        .title(format!(" {pos}/{total} "))
        .border_style(Style::default().fg(colors.border_focused()));

    let mut lines = vec![Line::from("")];
    if let Some(word) = session.current() {
        lines.push(Line::from(Span::styled(
            word.word.clone(),
            Style::default()
                .fg(colors.status(word.status))
                .add_modifier(Modifier::BOLD),
        )));
        if word.error_count() > 0 {
            lines.push(Line::from(Span::styled(
                t!("flashcard.missed", count = word.error_count()),
                Style::default().fg(colors.error()),
            )));
        }
        lines.push(Line::from(""));
        if session.is_flipped() {
            lines.push(Line::from(Span::styled(
                word.meaning.clone(),
                Style::default().fg(colors.fg()),
            )));
            if let Some(example) = &word.example {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    example.clone(),
                    Style::default().fg(colors.muted()),
                )));
            }
            if let Some(example_cn) = &word.example_cn {
                lines.push(Line::from(Span::styled(
                    example_cn.clone(),
                    Style::default().fg(colors.muted()),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                t!("flashcard.reveal"),
                Style::default().fg(colors.muted()),
            )));
        }
    }
    Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block)
        .render(card_area, frame.buffer_mut());
}

fn render_dictation(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.dictation"),
        &[t!("hint.check_next"), t!("hint.speak_again"), t!("hint.back")],
    );
    let Some(session) = app.dictation.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let (done, total) = session.progress();
    let (correct, _) = session.score();
    let area = centered_rect(60, 60, main);
    let block = Block::bordered()
        .title(format!(
            " {} ",
            t!(
                "dictation.progress",
                current = done + 1,
                total = total,
                correct = correct
            )
        ))
        .border_style(Style::default().fg(colors.border_focused()));

    let mut lines = vec![Line::from("")];
    match (session.phase(), session.current()) {
        (DictationPhase::Finished, _) | (_, None) => {
            lines.push(Line::from(Span::styled(
                t!("dictation.finished", correct = correct, total = total),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                t!("dictation.back_to_menu"),
                Style::default().fg(colors.muted()),
            )));
        }
        (phase, Some(word)) => {
            lines.push(Line::from(Span::styled(
                word.meaning.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            let cursor = if phase == DictationPhase::Typing { "▏" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("> {}{cursor}", session.input()),
                Style::default().fg(colors.highlight()),
            )));
            if let DictationPhase::Checked { correct } = phase {
                lines.push(Line::from(""));
                let (text, color) = if correct {
                    (t!("quiz.correct"), colors.success())
                } else {
                    (t!("dictation.answer", word = word.word), colors.error())
                };
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
            }
        }
    }
    Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(block)
        .render(area, frame.buffer_mut());
}

fn render_challenge(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.challenge"),
        &[t!("hint.answer"), t!("hint.next"), t!("hint.quit_challenge")],
    );
    let Some(session) = app.challenge.as_ref() else {
        return;
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(centered_rect(70, 90, main));

    let timer = ProgressBar::new(
        &t!(
            "challenge.label",
            current = session.index() + 1,
            total = session.total(),
            score = session.score()
        ),
        session.remaining_secs(),
        session.duration_secs(),
        app.theme,
    );
    frame.render_widget(timer, layout[0]);

    if let Some(question) = session.current() {
        let mut card = QuestionCard::new(question, app.theme);
        if let Phase::Answered(outcome) = session.phase() {
            card = card.answered(session.selected(), outcome);
        }
        frame.render_widget(card, layout[1]);
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    if let Some(ref summary) = app.last_summary {
        let centered = centered_rect(60, 80, area);
        frame.render_widget(Dashboard::new(summary, app.theme), centered);
    }
}

fn render_mistakes(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.mistakes"),
        &[
            t!("hint.practice"),
            t!("hint.delete"),
            t!("hint.clear"),
            t!("hint.back"),
        ],
    );
    let colors = &app.theme.colors;
    let block = Block::bordered()
        .title(format!(
            " {} ",
            t!("mistakes.title", count = app.mistake_rows.len())
        ))
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(main);
    block.render(main, frame.buffer_mut());

    if app.mistake_rows.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("mistakes.empty")),
            Style::default().fg(colors.success()),
        )))
        .render(inner, frame.buffer_mut());
        return;
    }

    let rows = inner.height as usize;
    let offset = ui::components::word_list::scroll_offset(app.mistakes_selected, rows);
    let server_marker = t!("mistakes.server");
    let lines: Vec<Line> = app
        .mistake_rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, r)| {
            let selected = i == app.mistakes_selected;
            let mut style = Style::default().fg(colors.fg());
            if selected {
                style = style.bg(colors.accent_dim()).add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                Span::styled(format!(" {} ", r.date), Style::default().fg(colors.muted())),
                Span::styled(format!("{:<16}", r.word), style),
                Span::styled(format!(" {:<16}", r.meaning), Style::default().fg(colors.muted())),
                Span::styled(
                    format!(" ×{}", r.error_count),
                    Style::default().fg(colors.error()),
                ),
                Span::styled(
                    if App::is_remote_row(r) {
                        format!("  {server_marker}")
                    } else {
                        String::new()
                    },
                    Style::default().fg(colors.muted()),
                ),
            ])
        })
        .collect();
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_check_in(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.check_in"),
        &[t!("hint.check_in_today"), t!("hint.back")],
    );
    let today = App::today();
    let area = centered_rect(60, 40, main);
    let strip = WeekStrip::new(
        app.check_ins.week_status(today),
        today,
        app.check_ins.current_streak(today),
        app.check_ins.total_days(),
        app.theme,
    );
    frame.render_widget(strip, area);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.settings"),
        &[
            t!("hint.select"),
            t!("hint.change"),
            t!("hint.account"),
            t!("hint.save_back"),
        ],
    );
    let colors = &app.theme.colors;
    let centered = centered_rect(60, 80, main);
    let block = Block::bordered()
        .title(format!(" {} ", t!("title.settings")))
        .border_style(Style::default().fg(colors.accent()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let mut lines = Vec::new();
    for (i, (label, value)) in app.settings_values().into_iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };
        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.highlight()
        } else {
            colors.muted()
        });
        lines.push(Line::from(Span::styled(format!("{indicator}{label}:"), label_style)));
        lines.push(Line::from(Span::styled(format!("     < {value} >"), value_style)));
        lines.push(Line::from(""));
    }

    let account = match (&app.remote, app.signed_in_as()) {
        (None, _) => t!("settings.offline"),
        (Some(_), Some(email)) => t!("settings.signed_in_as", email = email),
        (Some(_), None) => t!("settings.not_signed_in"),
    };
    lines.push(Line::from(Span::styled(
        format!("   {}", t!("settings.account", account = account)),
        Style::default().fg(colors.muted()),
    )));
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_login(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(
        frame,
        app,
        &t!("title.account"),
        &[
            t!("hint.next_field"),
            t!("hint.submit"),
            t!("hint.toggle_register"),
            t!("hint.cancel"),
        ],
    );
    let Some(form) = app.login_form.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let area = centered_rect(50, 60, main);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let heading = if form.register {
        t!("login.register")
    } else {
        t!("login.sign_in")
    };
    Paragraph::new(Line::from(Span::styled(
        heading,
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )))
    .render(layout[0], frame.buffer_mut());
    render_input(frame, app, layout[1], &t!("form.email"), &form.email, form.focus == Field::Email);
    render_input(
        frame,
        app,
        layout[2],
        &t!("form.password"),
        &form.password,
        form.focus == Field::Password,
    );
    if form.register {
        render_input(
            frame,
            app,
            layout[3],
            &t!("form.invite_code"),
            &form.invite_code,
            form.focus == Field::InviteCode,
        );
    }
    if let Some(error) = &form.error {
        Paragraph::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(colors.error()),
        )))
        .wrap(Wrap { trim: true })
        .render(layout[4], frame.buffer_mut());
    }
}
