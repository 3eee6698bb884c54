use rand::Rng;
use rand::rngs::SmallRng;

pub const MAX_MISSPELLINGS: usize = 3;

/// Corrupted spellings of `word` used as distractors in spelling questions.
///
/// Three independent corruptions are attempted when the length allows it:
/// swapping two adjacent letters (len > 2), doubling a letter (len > 1) and
/// dropping a letter (len > 3). Results are not deduplicated and may
/// coincide with the original when letters repeat.
pub fn misspellings(word: &str, rng: &mut SmallRng) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    let mut out = Vec::with_capacity(MAX_MISSPELLINGS);

    if len > 2 {
        let mut swapped = chars.clone();
        let pos = rng.gen_range(0..len - 1);
        swapped.swap(pos, pos + 1);
        out.push(swapped.into_iter().collect());
    }

    if len > 1 {
        let mut doubled = chars.clone();
        let pos = rng.gen_range(0..len);
        doubled.insert(pos, chars[pos]);
        out.push(doubled.into_iter().collect());
    }

    if len > 3 {
        let mut dropped = chars.clone();
        let pos = rng.gen_range(0..len);
        dropped.remove(pos);
        out.push(dropped.into_iter().collect());
    }

    out.truncate(MAX_MISSPELLINGS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn long_word_yields_three() {
        let mut rng = SmallRng::seed_from_u64(7);
        let out = misspellings("umbrella", &mut rng);
        assert_eq!(out.len(), 3);
        // doubled is one longer, dropped is one shorter
        assert_eq!(out[1].chars().count(), 9);
        assert_eq!(out[2].chars().count(), 7);
    }

    #[test]
    fn length_preconditions() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(misspellings("", &mut rng).is_empty());
        assert!(misspellings("a", &mut rng).is_empty());
        let two = misspellings("an", &mut rng);
        assert_eq!(two.len(), 1);
        assert!(two[0] == "aan" || two[0] == "ann");
        assert_eq!(misspellings("cat", &mut rng).len(), 2);
        assert_eq!(misspellings("cats", &mut rng).len(), 3);
    }

    #[test]
    fn distinct_letters_never_reproduce_original() {
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let out = misspellings("word", &mut rng);
            assert!(out.len() <= MAX_MISSPELLINGS);
            assert!(out.iter().all(|m| m != "word"), "seed {seed}: {out:?}");
        }
    }

    #[test]
    fn works_on_multibyte_chars() {
        let mut rng = SmallRng::seed_from_u64(3);
        let out = misspellings("café", &mut rng);
        assert_eq!(out.len(), 3);
    }
}
