use anyhow::Result;
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_i18n::t;

use crate::api::HttpClient;
use crate::api::category_store::CategoryStore;
use crate::api::custom_word_store::CustomWordStore;
use crate::api::user_store::{AuthOutcome, Field, UserStore};
use crate::api::word_store::{
    MistakeEntry, RemoteMistakes, WordStore, parse_remote_source, remote_source,
};
use crate::config::{Config, LANGUAGES, MAX_CHALLENGE_SIZE, MIN_CHALLENGE_SIZE};
use crate::quiz::generate_questions;
use crate::session::MistakeRecorder;
use crate::session::challenge::{ChallengeSession, Phase};
use crate::session::dictation::{DictationPhase, DictationSession};
use crate::session::flashcard::FlashcardSession;
use crate::session::result::ChallengeSummary;
use crate::speech::{Speaker, speaker_from_config};
use crate::store::LocalStorage;
use crate::store::check_in::CheckIns;
use crate::store::custom_vocab::CustomVocabularies;
use crate::store::mistakes::{
    BOOK_SOURCE, LocalMistakes, MistakeLog, MistakeRecord, ReviewWord, review_words,
};
use crate::store::settings::ChallengeSettings;
use crate::store::user::UserSlot;
use crate::store::word_status::WordStatuses;
use crate::ui::components::menu::Menu;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;
use crate::vocab::book::BookCatalog;
use crate::vocab::word::filter_by_status;
use crate::vocab::{Word, WordId, WordStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    BookSelect,
    CreateVocab,
    WordList,
    Flashcard,
    Dictation,
    Challenge,
    ChallengeResult,
    Mistakes,
    CheckIn,
    Settings,
    Login,
}

/// Where the active word list comes from. Decides how marks and misses are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordSource {
    Book(String),
    Custom(String),
    Remote { category: String, subcategory: String },
    RemoteCustom(i64),
    Mistakes,
}

impl WordSource {
    /// Key that scopes word ids in the mistake log. Practicing mistakes keeps
    /// each word's own key, so `Mistakes` never records under its own.
    pub fn mistake_source(&self) -> String {
        match self {
            WordSource::Book(_) | WordSource::Mistakes => BOOK_SOURCE.to_string(),
            WordSource::Custom(id) => format!("custom:{id}"),
            WordSource::Remote {
                category,
                subcategory,
            } => remote_source(category, subcategory),
            WordSource::RemoteCustom(id) => format!("remote-custom:{id}"),
        }
    }
}

pub struct SourceEntry {
    pub source: WordSource,
    pub label: String,
    pub detail: String,
}

/// Remote stores sharing one HTTP client. Only built when an API url is configured.
pub struct Remote {
    pub words: WordStore,
    pub categories: CategoryStore,
    pub custom: CustomWordStore,
    pub users: UserStore,
}

impl Remote {
    pub fn connect(base_url: &str, storage: LocalStorage) -> Self {
        Self::with_client(HttpClient::new(base_url), storage)
    }

    pub fn with_client(client: HttpClient, storage: LocalStorage) -> Self {
        log::info!("remote api at {}", client.base_url());
        Self {
            words: WordStore::new(client.clone()),
            categories: CategoryStore::new(client.clone()),
            custom: CustomWordStore::new(client.clone()),
            users: UserStore::new(client, UserSlot::new(storage)),
        }
    }
}

/// Routes misses made while practicing the mistake list back to the source
/// each word came from.
struct ReviewMistakes<'a> {
    log: &'a MistakeLog,
    store: Option<&'a mut WordStore>,
    review: &'a [ReviewWord],
}

impl MistakeRecorder for ReviewMistakes<'_> {
    fn record_mistake(&mut self, word: &Word) {
        let review = self.review;
        let source = review
            .iter()
            .find(|r| r.matches(word))
            .map_or(BOOK_SOURCE, |r| r.source.as_str());
        match (parse_remote_source(source), self.store.as_deref_mut()) {
            (Some((category, subcategory)), Some(store)) => RemoteMistakes {
                store,
                category,
                subcategory,
            }
            .record_mistake(word),
            _ => LocalMistakes {
                log: self.log,
                source,
            }
            .record_mistake(word),
        }
    }
}

/// Stored marks for review words that have a local home.
fn restore_review_statuses(
    review: &mut [ReviewWord],
    statuses: &WordStatuses,
    custom_vocabs: &CustomVocabularies,
) {
    for entry in review.iter_mut() {
        if entry.source == BOOK_SOURCE {
            if let Some(id) = entry.word.id.as_num() {
                entry.word.status = statuses.status(id);
            }
        } else if let Some(vocab_id) = entry.source.strip_prefix("custom:") {
            let stored = custom_vocabs
                .get(vocab_id)
                .and_then(|v| v.to_words().into_iter().find(|w| w.id == entry.word.id));
            if let Some(stored) = stored {
                entry.word.status = stored.status;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VocabField {
    Name,
    Emoji,
    Words,
}

pub struct VocabForm {
    pub name: LineInput,
    pub emoji: LineInput,
    pub words: LineInput,
    pub focus: VocabField,
}

impl VocabForm {
    fn new() -> Self {
        Self {
            name: LineInput::new(""),
            emoji: LineInput::new(""),
            words: LineInput::new("").multiline(),
            focus: VocabField::Name,
        }
    }

    pub fn focused_mut(&mut self) -> &mut LineInput {
        match self.focus {
            VocabField::Name => &mut self.name,
            VocabField::Emoji => &mut self.emoji,
            VocabField::Words => &mut self.words,
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            VocabField::Name => VocabField::Emoji,
            VocabField::Emoji => VocabField::Words,
            VocabField::Words => VocabField::Name,
        };
    }
}

pub struct LoginForm {
    pub email: LineInput,
    pub password: LineInput,
    pub invite_code: LineInput,
    pub focus: Field,
    pub register: bool,
    pub error: Option<String>,
}

impl LoginForm {
    fn new() -> Self {
        Self {
            email: LineInput::new(""),
            password: LineInput::new("").masked(),
            invite_code: LineInput::new(""),
            focus: Field::Email,
            register: false,
            error: None,
        }
    }

    pub fn focused_mut(&mut self) -> &mut LineInput {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::InviteCode => &mut self.invite_code,
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match (self.focus, self.register) {
            (Field::Email, _) => Field::Password,
            (Field::Password, true) => Field::InviteCode,
            _ => Field::Email,
        };
    }
}

pub const SETTINGS_FIELDS: usize = 5;

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    pub status_message: Option<String>,

    pub check_ins: CheckIns,
    pub mistake_log: MistakeLog,
    pub custom_vocabs: CustomVocabularies,
    pub statuses: WordStatuses,
    pub challenge_settings: ChallengeSettings,
    pub remote: Option<Remote>,
    pub catalog: BookCatalog,

    pub source: WordSource,
    pub source_name: String,
    pub words: Vec<Word>,
    /// Where each word came from while the mistake list is the source.
    pub review: Vec<ReviewWord>,
    pub sources: Vec<SourceEntry>,
    pub source_selected: usize,
    pub word_filter: Option<WordStatus>,
    pub list_selected: usize,
    pub hide_meanings: bool,

    pub flashcard: Option<FlashcardSession>,
    pub dictation: Option<DictationSession>,
    pub challenge: Option<ChallengeSession>,
    pub last_summary: Option<ChallengeSummary>,

    pub mistake_rows: Vec<MistakeRecord>,
    pub mistakes_selected: usize,
    pub settings_selected: usize,
    pub vocab_form: Option<VocabForm>,
    pub login_form: Option<LoginForm>,

    speaker: Box<dyn Speaker>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, storage: LocalStorage) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let remote = config
            .api_base_url
            .as_deref()
            .map(|url| Remote::connect(url, storage.clone()));
        let speaker = speaker_from_config(config.speech_enabled, &config.speech_command);
        let default_book = config.default_book.clone();

        let mut app = Self {
            screen: AppScreen::Menu,
            menu: Menu::main(theme),
            theme,
            config,
            should_quit: false,
            status_message: None,
            check_ins: CheckIns::new(storage.clone()),
            mistake_log: MistakeLog::new(storage.clone()),
            custom_vocabs: CustomVocabularies::new(storage.clone()),
            statuses: WordStatuses::new(storage.clone()),
            challenge_settings: ChallengeSettings::new(storage),
            remote,
            catalog: BookCatalog::load(),
            source: WordSource::Book(default_book.clone()),
            source_name: String::new(),
            words: Vec::new(),
            review: Vec::new(),
            sources: Vec::new(),
            source_selected: 0,
            word_filter: None,
            list_selected: 0,
            hide_meanings: false,
            flashcard: None,
            dictation: None,
            challenge: None,
            last_summary: None,
            mistake_rows: Vec::new(),
            mistakes_selected: 0,
            settings_selected: 0,
            vocab_form: None,
            login_form: None,
            speaker,
            rng: SmallRng::from_entropy(),
        };

        if app.catalog.get(&default_book).is_none() {
            log::warn!("default book {default_book} not found");
            if let Some(first) = app.catalog.books().first() {
                app.source = WordSource::Book(first.id.clone());
            }
        }
        app.reload_words();
        app
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn go_to_menu(&mut self) {
        self.speaker.stop();
        self.flashcard = None;
        self.dictation = None;
        self.challenge = None;
        self.screen = AppScreen::Menu;
    }

    // ---- word sources ----

    pub fn reload_words(&mut self) {
        let (name, mut words) = match &self.source {
            WordSource::Book(id) => match self.catalog.get(id) {
                Some(book) => (format!("{} {}", book.emoji, book.name), book.words.clone()),
                None => (id.clone(), Vec::new()),
            },
            WordSource::Custom(id) => match self.custom_vocabs.get(id) {
                Some(vocab) => (format!("{} {}", vocab.emoji, vocab.name), vocab.to_words()),
                None => (id.clone(), Vec::new()),
            },
            WordSource::Remote {
                category,
                subcategory,
            } => {
                let words = self
                    .remote
                    .as_mut()
                    .map(|r| r.words.words(category, subcategory).to_vec())
                    .unwrap_or_default();
                (format!("{category}/{subcategory}"), words)
            }
            WordSource::RemoteCustom(id) => {
                let found = self.remote.as_mut().and_then(|r| {
                    r.custom
                        .categories()
                        .iter()
                        .find(|c| c.id == *id)
                        .map(|c| (format!("{} {}", c.emoji, c.name), c.words.clone()))
                });
                found.unwrap_or_else(|| (t!("source.remote_custom", id = id).to_string(), Vec::new()))
            }
            WordSource::Mistakes => {
                let rows = Self::collect_mistake_rows(&self.mistake_log, &mut self.remote);
                self.review = review_words(&rows);
                restore_review_statuses(&mut self.review, &self.statuses, &self.custom_vocabs);
                let words = self.review.iter().map(|r| r.word.clone()).collect();
                (t!("source.mistakes").to_string(), words)
            }
        };
        if let WordSource::Book(_) = self.source {
            self.statuses.apply(&mut words);
        }
        log::debug!("loaded {} words from {name}", words.len());
        if self.source != WordSource::Mistakes {
            self.review.clear();
        }
        self.source_name = name;
        self.words = words;
        self.list_selected = 0;
    }

    pub fn go_to_book_select(&mut self) {
        let mut sources: Vec<SourceEntry> = self
            .catalog
            .books()
            .iter()
            .map(|b| SourceEntry {
                source: WordSource::Book(b.id.clone()),
                label: format!("{} {}", b.emoji, b.name),
                detail: t!(
                    "source.book_detail",
                    count = b.words.len(),
                    category = b.category,
                    subcategory = b.subcategory
                )
                .to_string(),
            })
            .collect();
        sources.extend(self.custom_vocabs.all().into_iter().map(|v| SourceEntry {
            detail: t!("source.custom_detail", count = v.words.len()).to_string(),
            label: format!("{} {}", v.emoji, v.name),
            source: WordSource::Custom(v.id),
        }));
        if let Some(remote) = self.remote.as_mut() {
            for category in remote.categories.categories() {
                for sub in &category.subcategories {
                    let detail = match remote.words.cached(&category.id, &sub.id) {
                        Some(words) => t!("source.online_loaded_detail", count = words.len()),
                        None => t!("source.online_detail", count = sub.word_count),
                    };
                    sources.push(SourceEntry {
                        source: WordSource::Remote {
                            category: category.id.clone(),
                            subcategory: sub.id.clone(),
                        },
                        label: format!("{} {} · {}", category.emoji, category.name, sub.name),
                        detail: detail.to_string(),
                    });
                }
            }
            for custom in remote.custom.categories() {
                sources.push(SourceEntry {
                    source: WordSource::RemoteCustom(custom.id),
                    label: format!("{} {}", custom.emoji, custom.name),
                    detail: t!("source.online_custom_detail", count = custom.words.len())
                        .to_string(),
                });
            }
        }
        self.source_selected = sources
            .iter()
            .position(|s| s.source == self.source)
            .unwrap_or(0);
        self.sources = sources;
        self.screen = AppScreen::BookSelect;
    }

    pub fn select_source(&mut self) {
        if let Some(entry) = self.sources.get(self.source_selected) {
            self.source = entry.source.clone();
            // picking a remote book again refetches it
            if let (WordSource::Remote { category, subcategory }, Some(remote)) =
                (&self.source, self.remote.as_mut())
            {
                remote.words.invalidate(category, subcategory);
            }
            self.reload_words();
            self.set_status(t!("status.studying", name = self.source_name));
            self.screen = AppScreen::WordList;
        }
    }

    /// Delete the highlighted custom vocabulary, local or remote.
    pub fn delete_selected_source(&mut self) -> Result<()> {
        let Some(source) = self.sources.get(self.source_selected).map(|e| e.source.clone()) else {
            return Ok(());
        };
        let deleted = match &source {
            WordSource::Custom(id) => self.custom_vocabs.delete(id)?,
            WordSource::RemoteCustom(id) => self
                .remote
                .as_mut()
                .is_some_and(|r| r.custom.delete(*id)),
            _ => {
                self.set_status(t!("status.only_custom_deletable"));
                return Ok(());
            }
        };
        if deleted {
            let removed = self.sources.remove(self.source_selected);
            if removed.source == self.source {
                self.source = WordSource::Book(self.config.default_book.clone());
                self.reload_words();
            }
            self.source_selected = self.source_selected.min(self.sources.len().saturating_sub(1));
            self.set_status(t!("status.deleted", name = removed.label));
        } else {
            self.set_status(t!("status.nothing_deleted"));
        }
        Ok(())
    }

    pub fn start_create_vocab(&mut self) {
        self.vocab_form = Some(VocabForm::new());
        self.screen = AppScreen::CreateVocab;
    }

    pub fn handle_vocab_form(&mut self, key: crossterm::event::KeyEvent) -> Result<()> {
        let Some(form) = self.vocab_form.as_mut() else {
            return Ok(());
        };
        if key.code == crossterm::event::KeyCode::Tab {
            form.cycle_focus();
            return Ok(());
        }
        match form.focused_mut().handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => {
                self.vocab_form = None;
                self.go_to_book_select();
            }
            InputResult::Submit => {
                if form.focus != VocabField::Words {
                    form.cycle_focus();
                    return Ok(());
                }
                let name = form.name.value().to_string();
                let emoji = form.emoji.value().to_string();
                let text = form.words.value().to_string();
                match self.custom_vocabs.create(&name, &emoji, &text) {
                    Ok((vocab, issues)) => {
                        let mut message = t!(
                            "status.vocab_created",
                            name = vocab.name,
                            count = vocab.words.len()
                        )
                        .to_string();
                        if !issues.is_empty() {
                            message.push_str(&t!("status.vocab_skipped", count = issues.len()));
                        }
                        self.vocab_form = None;
                        self.source = WordSource::Custom(vocab.id);
                        self.reload_words();
                        self.set_status(message);
                        self.screen = AppScreen::WordList;
                    }
                    Err(e) => self.set_status(format!("{e}")),
                }
            }
        }
        Ok(())
    }

    // ---- word list / marking ----

    pub fn visible_words(&self) -> Vec<&Word> {
        filter_by_status(&self.words, self.word_filter)
    }

    pub fn cycle_filter(&mut self) {
        self.word_filter = match self.word_filter {
            None => Some(WordStatus::Known),
            Some(WordStatus::Known) => Some(WordStatus::Unknown),
            Some(WordStatus::Unknown) => Some(WordStatus::Unmarked),
            Some(WordStatus::Unmarked) => None,
        };
        self.list_selected = 0;
    }

    pub fn list_move(&mut self, down: bool) {
        let len = self.visible_words().len();
        if len == 0 {
            return;
        }
        self.list_selected = if down {
            (self.list_selected + 1).min(len - 1)
        } else {
            self.list_selected.saturating_sub(1)
        };
    }

    /// Toggle `target` on the highlighted word in the list view.
    pub fn mark_selected(&mut self, target: WordStatus) {
        let Some(word) = self.visible_words().get(self.list_selected).map(|w| (*w).clone()) else {
            return;
        };
        let status = word.status.toggled(target);
        self.apply_status(&word, status);
        let len = self.visible_words().len();
        self.list_selected = self.list_selected.min(len.saturating_sub(1));
    }

    /// Persist a status change where `word` comes from and mirror it in `words`.
    /// Returns false when the change was not accepted.
    pub fn apply_status(&mut self, word: &Word, status: WordStatus) -> bool {
        let origin = match &self.source {
            WordSource::Mistakes => self
                .review
                .iter()
                .find(|r| r.matches(word))
                .map(|r| r.source.clone())
                .unwrap_or_default(),
            source => source.mistake_source(),
        };
        let accepted = match (&word.id, origin.strip_prefix("custom:")) {
            (WordId::Num(n), _) if origin == BOOK_SOURCE => match self.statuses.set(*n, status) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("failed to save word status: {e}");
                    false
                }
            },
            (WordId::Text(word_id), Some(vocab_id)) => {
                match self.custom_vocabs.set_word_status(vocab_id, word_id, status) {
                    Ok(found) => found,
                    Err(e) => {
                        log::error!("failed to save word status: {e}");
                        false
                    }
                }
            }
            (WordId::Num(n), _) => match parse_remote_source(&origin) {
                Some((category, subcategory)) => self
                    .remote
                    .as_mut()
                    .is_some_and(|r| r.words.mark(category, subcategory, *n, status)),
                None => {
                    log::debug!("status for {} kept in memory only", word.id);
                    true
                }
            },
            _ => {
                log::debug!("status for {} kept in memory only", word.id);
                true
            }
        };
        if accepted {
            let same = |w: &Word| w.id == word.id && w.word == word.word;
            if let Some(w) = self.words.iter_mut().find(|w| same(w)) {
                w.status = status;
            }
            if let Some(r) = self.review.iter_mut().find(|r| same(&r.word)) {
                r.word.status = status;
            }
        } else {
            self.set_status(t!("status.save_failed"));
        }
        accepted
    }

    pub fn speak(&mut self, text: &str) {
        if let Err(e) = self.speaker.speak(text, "en-US") {
            log::debug!("speech unavailable: {e}");
        }
    }

    /// Runs `f` with the recorder matching the active source.
    fn with_recorder<R>(
        source: &WordSource,
        remote: &mut Option<Remote>,
        log: &MistakeLog,
        review: &[ReviewWord],
        f: impl FnOnce(&mut dyn MistakeRecorder) -> R,
    ) -> R {
        match (source, remote.as_mut()) {
            (
                WordSource::Remote {
                    category,
                    subcategory,
                },
                Some(remote),
            ) => {
                let mut recorder = RemoteMistakes {
                    store: &mut remote.words,
                    category,
                    subcategory,
                };
                f(&mut recorder)
            }
            (WordSource::Mistakes, remote) => {
                let mut recorder = ReviewMistakes {
                    log,
                    store: remote.map(|r| &mut r.words),
                    review,
                };
                f(&mut recorder)
            }
            (source, _) => {
                let key = source.mistake_source();
                let mut recorder = LocalMistakes { log, source: &key };
                f(&mut recorder)
            }
        }
    }

    // ---- flashcards ----

    pub fn start_flashcards(&mut self) {
        let words: Vec<Word> = self.visible_words().into_iter().cloned().collect();
        if words.is_empty() {
            self.set_status(t!("status.no_words_review"));
            return;
        }
        self.flashcard = Some(FlashcardSession::new(words));
        self.screen = AppScreen::Flashcard;
    }

    pub fn flashcard_mark(&mut self, target: WordStatus) {
        let Some((word, status)) = self
            .flashcard
            .as_ref()
            .and_then(|s| s.current())
            .map(|w| (w.clone(), w.status.toggled(target)))
        else {
            return;
        };
        if self.apply_status(&word, status) {
            if let Some(session) = self.flashcard.as_mut() {
                session.mark(target);
            }
        }
    }

    // ---- dictation ----

    pub fn start_dictation(&mut self) {
        let mut words: Vec<Word> = self.visible_words().into_iter().cloned().collect();
        if words.is_empty() {
            self.set_status(t!("status.no_words_practice"));
            return;
        }
        words.shuffle(&mut self.rng);
        words.truncate(self.config.challenge_size);
        self.dictation = Some(DictationSession::new(words));
        self.screen = AppScreen::Dictation;
        self.speak_dictation_word();
    }

    pub fn speak_dictation_word(&mut self) {
        let text = self
            .dictation
            .as_ref()
            .and_then(|d| d.current())
            .map(|w| w.word.clone());
        if let Some(text) = text {
            self.speak(&text);
        }
    }

    pub fn dictation_submit(&mut self) {
        let Some(session) = self.dictation.as_mut() else {
            return;
        };
        match session.phase() {
            DictationPhase::Typing => {
                Self::with_recorder(
                    &self.source,
                    &mut self.remote,
                    &self.mistake_log,
                    &self.review,
                    |r| session.submit(r),
                );
            }
            DictationPhase::Checked { .. } => {
                if session.next() == DictationPhase::Typing {
                    self.speak_dictation_word();
                }
            }
            DictationPhase::Finished => self.go_to_menu(),
        }
    }

    // ---- challenge ----

    pub fn start_challenge(&mut self) {
        let mut pool: Vec<Word> = self.visible_words().into_iter().cloned().collect();
        if pool.is_empty() {
            self.set_status(t!("status.no_words_challenge"));
            return;
        }
        pool.shuffle(&mut self.rng);
        pool.truncate(self.config.challenge_size);
        let questions = generate_questions(&pool, &mut self.rng);
        let duration = self.challenge_settings.timer_duration();
        log::info!(
            "challenge started: {} questions, {duration}s each",
            questions.len()
        );
        self.challenge = Some(ChallengeSession::new(questions, duration));
        self.last_summary = None;
        self.screen = AppScreen::Challenge;
    }

    pub fn challenge_tick(&mut self) {
        let Some(session) = self.challenge.as_mut() else {
            return;
        };
        Self::with_recorder(
            &self.source,
            &mut self.remote,
            &self.mistake_log,
            &self.review,
            |r| session.tick(r),
        );
    }

    pub fn challenge_select(&mut self, option_idx: usize) {
        let Some(session) = self.challenge.as_mut() else {
            return;
        };
        Self::with_recorder(
            &self.source,
            &mut self.remote,
            &self.mistake_log,
            &self.review,
            |r| session.select(option_idx, r),
        );
    }

    pub fn challenge_next(&mut self) {
        let Some(session) = self.challenge.as_mut() else {
            return;
        };
        if session.next() == Phase::Completed {
            let summary = session.summary();
            log::info!(
                "challenge finished: {}/{} correct",
                summary.correct,
                summary.total
            );
            self.last_summary = Some(summary);
            self.challenge = None;
            self.screen = AppScreen::ChallengeResult;
        }
    }

    // ---- mistakes ----

    pub fn go_to_mistakes(&mut self) {
        self.refresh_mistakes();
        self.mistakes_selected = 0;
        self.screen = AppScreen::Mistakes;
    }

    /// Local records plus, when a server is configured, its mistake history.
    /// Newest day first.
    fn collect_mistake_rows(log: &MistakeLog, remote: &mut Option<Remote>) -> Vec<MistakeRecord> {
        let mut rows: Vec<MistakeRecord> = log
            .by_date()
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect();
        if let Some(remote) = remote.as_mut() {
            rows.extend(remote.words.mistakes().iter().flat_map(MistakeEntry::records));
            rows.sort_by(|a, b| b.date.cmp(&a.date));
        }
        rows
    }

    fn refresh_mistakes(&mut self) {
        self.mistake_rows = Self::collect_mistake_rows(&self.mistake_log, &mut self.remote);
        self.mistakes_selected = self
            .mistakes_selected
            .min(self.mistake_rows.len().saturating_sub(1));
    }

    /// Whether a mistake row came from the server rather than the local log.
    pub fn is_remote_row(row: &MistakeRecord) -> bool {
        parse_remote_source(&row.source).is_some()
    }

    /// Only local rows can be deleted; the server keeps its own history.
    pub fn delete_selected_mistake(&mut self) -> Result<()> {
        let Some(row) = self.mistake_rows.get(self.mistakes_selected) else {
            return Ok(());
        };
        if Self::is_remote_row(row) {
            self.set_status(t!("status.remote_mistake_kept"));
            return Ok(());
        }
        let key = (row.source.clone(), row.word_id.clone(), row.date);
        self.mistake_log.delete(&[key])?;
        self.refresh_mistakes();
        Ok(())
    }

    pub fn clear_mistakes(&mut self) -> Result<()> {
        self.mistake_log.clear()?;
        self.refresh_mistakes();
        Ok(())
    }

    /// Switch to the missed-word list and start a challenge over all of it.
    pub fn practice_mistakes(&mut self) {
        self.source = WordSource::Mistakes;
        self.word_filter = None;
        self.reload_words();
        self.start_challenge();
    }

    // ---- check-in ----

    pub fn go_to_check_in(&mut self) {
        self.screen = AppScreen::CheckIn;
    }

    pub fn check_in_today(&mut self) -> Result<()> {
        if self.check_ins.check_in(Self::today())? {
            self.set_status(t!("status.checked_in"));
        } else {
            self.set_status(t!("status.already_checked_in"));
        }
        Ok(())
    }

    // ---- settings ----

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn settings_cycle(&mut self, forward: bool) -> Result<()> {
        match self.settings_selected {
            0 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return Ok(());
                }
                let idx = themes
                    .iter()
                    .position(|t| *t == self.config.theme)
                    .unwrap_or(0);
                let next = if forward {
                    (idx + 1) % themes.len()
                } else {
                    (idx + themes.len() - 1) % themes.len()
                };
                self.config.theme = themes[next].clone();
                if let Some(theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(theme));
                    self.theme = theme;
                    self.menu.theme = theme;
                }
            }
            1 => {
                self.challenge_settings.cycle_timer_duration(forward)?;
            }
            2 => {
                let step = 5;
                let size = self.config.challenge_size;
                self.config.challenge_size = if forward {
                    (size + step).min(MAX_CHALLENGE_SIZE)
                } else {
                    size.saturating_sub(step).max(MIN_CHALLENGE_SIZE)
                };
            }
            3 => {
                self.config.speech_enabled = !self.config.speech_enabled;
                self.speaker =
                    speaker_from_config(self.config.speech_enabled, &self.config.speech_command);
            }
            4 => {
                let idx = LANGUAGES
                    .iter()
                    .position(|l| *l == self.config.language)
                    .unwrap_or(0);
                let next = if forward {
                    (idx + 1) % LANGUAGES.len()
                } else {
                    (idx + LANGUAGES.len() - 1) % LANGUAGES.len()
                };
                self.config.language = LANGUAGES[next].to_string();
                rust_i18n::set_locale(&self.config.language);
                // menu labels are built once per locale
                let selected = self.menu.selected;
                self.menu = Menu::main(self.theme);
                self.menu.selected = selected;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn settings_values(&self) -> Vec<(String, String)> {
        let speech = if self.config.speech_enabled {
            t!("settings.on")
        } else {
            t!("settings.off")
        };
        vec![
            (t!("settings.theme").to_string(), self.config.theme.clone()),
            (
                t!("settings.timer").to_string(),
                format!("{}s", self.challenge_settings.timer_duration()),
            ),
            (
                t!("settings.size").to_string(),
                self.config.challenge_size.to_string(),
            ),
            (t!("settings.speech").to_string(), speech.to_string()),
            (
                t!("settings.language").to_string(),
                self.config.language.clone(),
            ),
        ]
    }

    // ---- account ----

    pub fn go_to_login(&mut self) {
        if self.remote.is_none() {
            self.set_status(t!("status.login_needs_url"));
            return;
        }
        self.login_form = Some(LoginForm::new());
        self.screen = AppScreen::Login;
    }

    pub fn signed_in_as(&self) -> Option<&str> {
        self.remote
            .as_ref()
            .and_then(|r| r.users.current())
            .map(|u| u.email.as_str())
    }

    pub fn logout(&mut self) {
        if let Some(remote) = self.remote.as_mut() {
            remote.users.logout();
            self.set_status(t!("status.signed_out"));
        }
    }

    pub fn handle_login_form(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::{KeyCode, KeyModifiers};

        let (Some(form), Some(remote)) = (self.login_form.as_mut(), self.remote.as_mut()) else {
            return;
        };
        match key.code {
            KeyCode::Tab => {
                form.cycle_focus();
                return;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.register = !form.register;
                if !form.register && form.focus == Field::InviteCode {
                    form.focus = Field::Email;
                }
                return;
            }
            _ => {}
        }
        match form.focused_mut().handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => {
                self.login_form = None;
                self.screen = AppScreen::Settings;
            }
            InputResult::Submit => {
                let outcome = if form.register {
                    remote.users.register(
                        form.email.value(),
                        form.password.value(),
                        form.invite_code.value(),
                    )
                } else {
                    remote.users.login(form.email.value(), form.password.value())
                };
                match outcome {
                    AuthOutcome::SignedIn(user) => {
                        log::info!("signed in as {}", user.email);
                        self.login_form = None;
                        self.status_message = Some(t!("status.signed_in", email = user.email).to_string());
                        self.screen = AppScreen::Settings;
                    }
                    AuthOutcome::Invalid(errors) => {
                        if let Some(field) = [Field::Email, Field::Password, Field::InviteCode]
                            .into_iter()
                            .find(|f| errors.get(*f).is_some())
                        {
                            form.focus = field;
                        }
                        let text: Vec<String> = errors.0.iter().map(|(_, e)| e.to_string()).collect();
                        form.error = Some(text.join("; "));
                    }
                    AuthOutcome::Rejected(message) => {
                        form.error =
                            Some(message.unwrap_or_else(|| t!("login.failed").to_string()));
                    }
                }
            }
        }
    }
}
