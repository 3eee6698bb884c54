use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use vocabdr::quiz::generate_questions;
use vocabdr::session::challenge::{ChallengeSession, Outcome, Phase};
use vocabdr::store::LocalStorage;
use vocabdr::store::check_in::CheckIns;
use vocabdr::store::custom_vocab::CustomVocabularies;
use vocabdr::store::mistakes::{BOOK_SOURCE, LocalMistakes, MistakeLog, review_words};
use vocabdr::store::word_status::WordStatuses;
use vocabdr::vocab::WordStatus;
use vocabdr::vocab::book::BookCatalog;

fn make_storage() -> (TempDir, LocalStorage) {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, storage)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn every_bundled_book_yields_a_full_challenge() {
    let catalog = BookCatalog::load();
    assert!(!catalog.books().is_empty());
    let mut rng = SmallRng::seed_from_u64(7);
    for book in catalog.books() {
        let questions = generate_questions(&book.words, &mut rng);
        assert_eq!(questions.len(), book.words.len(), "book {}", book.id);
        for q in &questions {
            assert!(q.correct_index().is_some(), "book {}: {}", book.id, q.question);
        }
    }
}

#[test]
fn wrong_answers_land_in_the_mistake_log() {
    let (_dir, storage) = make_storage();
    let log = MistakeLog::new(storage.clone());
    let mut recorder = LocalMistakes {
        log: &log,
        source: BOOK_SOURCE,
    };
    let catalog = BookCatalog::load();
    let book = &catalog.books()[0];
    let mut rng = SmallRng::seed_from_u64(42);
    let questions = generate_questions(&book.words, &mut rng);
    let mut session = ChallengeSession::new(questions, 15);

    let mut wrong = 0;
    while session.phase() != Phase::Completed {
        let question = session.current().unwrap();
        let pick = (0..question.options.len()).find(|&i| !question.is_correct(i));
        match pick {
            Some(i) => {
                assert_eq!(session.select(i, &mut recorder), Some(Outcome::Wrong));
                wrong += 1;
            }
            None => {
                let i = question.correct_index().unwrap();
                session.select(i, &mut recorder);
            }
        }
        session.next();
    }

    let summary = session.summary();
    assert_eq!(summary.wrong, wrong);
    assert_eq!(summary.total, book.words.len());
    assert_eq!(log.records().len(), wrong);
    assert!(log.records().iter().all(|r| r.source == BOOK_SOURCE));

    // a fresh handle over the same directory sees the same log
    let reopened = MistakeLog::new(storage);
    assert_eq!(review_words(&reopened.records()).len(), wrong);
}

#[test]
fn export_then_import_restores_state() {
    let (_src_dir, source) = make_storage();
    CheckIns::new(source.clone())
        .check_in(date("2026-03-02"))
        .unwrap();
    WordStatuses::new(source.clone())
        .set(1001, WordStatus::Known)
        .unwrap();
    CustomVocabularies::new(source.clone())
        .create("Kitchen", "🍳", "pan,平底锅\nknife,刀")
        .unwrap();
    let export = source.export_all();

    let (_dst_dir, target) = make_storage();
    let target_checkins = CheckIns::new(target.clone());
    target_checkins.check_in(date("2026-01-01")).unwrap();
    let target_mistakes = MistakeLog::new(target.clone());
    target_mistakes
        .record(
            BOOK_SOURCE,
            &vocabdr::vocab::Word::new(5_i64, "stale", "旧"),
            date("2026-01-01"),
        )
        .unwrap();

    target.import_all(&export).unwrap();

    let records = target_checkins.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, date("2026-03-02"));
    assert_eq!(
        WordStatuses::new(target.clone()).status(1001),
        WordStatus::Known
    );
    let vocabs = CustomVocabularies::new(target.clone()).all();
    assert_eq!(vocabs.len(), 1);
    assert_eq!(vocabs[0].words.len(), 2);
    // keys missing from the backup are gone after import
    assert!(target_mistakes.records().is_empty());
    assert!(!target.check_interrupted_import());
}

#[test]
fn import_with_unknown_version_leaves_data_untouched() {
    let (_dir, storage) = make_storage();
    let checkins = CheckIns::new(storage.clone());
    checkins.check_in(date("2026-02-10")).unwrap();

    let mut export = storage.export_all();
    export.vocabdr_export_version = 99;
    export.entries.clear();

    assert!(storage.import_all(&export).is_err());
    assert_eq!(checkins.total_days(), 1);
}
