use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocabdr::quiz::generate_questions;
use vocabdr::quiz::misspell::misspellings;
use vocabdr::session::challenge::ChallengeSession;
use vocabdr::vocab::Word;

fn make_words(count: usize) -> Vec<Word> {
    let stems = ["abandon", "benefit", "capture", "deliver", "estimate", "fragile"];
    (0..count)
        .map(|i| {
            let stem = stems[i % stems.len()];
            Word::new(i as i64, &format!("{stem}{i}"), &format!("meaning {i}"))
        })
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    let words = make_words(200);

    c.bench_function("generate_questions (200 words)", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| generate_questions(black_box(&words), &mut rng))
    });
}

fn bench_misspell(c: &mut Criterion) {
    c.bench_function("misspellings (long word)", |b| {
        let mut rng = SmallRng::seed_from_u64(2);
        b.iter(|| misspellings(black_box("responsibility"), &mut rng))
    });
}

fn bench_challenge_run(c: &mut Criterion) {
    let words = make_words(50);
    let mut rng = SmallRng::seed_from_u64(3);
    let questions = generate_questions(&words, &mut rng);

    c.bench_function("challenge run (50 questions, all timed out)", |b| {
        b.iter(|| {
            let mut session = ChallengeSession::new(questions.clone(), 10);
            let mut missed: Vec<Word> = Vec::new();
            while !session.is_complete() {
                for _ in 0..10 {
                    session.tick(&mut missed);
                }
                session.next();
            }
            black_box(session.summary())
        })
    });
}

criterion_group!(benches, bench_generate, bench_misspell, bench_challenge_run);
criterion_main!(benches);
