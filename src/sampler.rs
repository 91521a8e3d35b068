//! Passphrase sampling.
//!
//! Draws are independent and uniform over the whole collection, with
//! replacement: the same word may appear more than once.

use rand::{seq::SliceRandom, Rng};

use crate::error::AppError;

/// Pick `count` words from `words` with replacement and join them with
/// `separator`.
///
/// Fails with [`AppError::InsufficientWords`] when the collection holds fewer
/// than `count` words.
pub fn generate<R: Rng + ?Sized>(
    words: &[String],
    count: usize,
    separator: &str,
    rng: &mut R,
) -> Result<String, AppError> {
    if words.len() < count {
        return Err(AppError::InsufficientWords { requested: count, available: words.len() });
    }

    let mut chosen: Vec<&str> = Vec::with_capacity(count);
    for _ in 0..count {
        // None only for an empty slice, ruled out above.
        if let Some(word) = words.choose(rng) {
            chosen.push(word);
        }
    }
    Ok(chosen.join(separator))
}

/// Entropy in bits of `count` independent uniform draws from `collection_size`
/// words: `count * log2(collection_size)`.
pub fn entropy_bits(collection_size: usize, count: usize) -> f64 {
    if collection_size == 0 {
        return 0.0;
    }
    count as f64 * (collection_size as f64).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn collection(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn returns_exactly_n_words_with_n_minus_one_separators() {
        let words = collection(&["apple", "banana", "cherry", "date", "elder", "fig"]);
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..=8 {
            let words = if n > words.len() { collection(&["a"; 8]) } else { words.clone() };
            let phrase = generate(&words, n, "-", &mut rng).unwrap();
            assert_eq!(phrase.split('-').count(), n);
            assert_eq!(phrase.matches('-').count(), n - 1);
            assert!(phrase.split('-').all(|w| words.contains(&w.to_string())));
        }
    }

    #[test]
    fn custom_separator() {
        let words = collection(&["uno", "due", "tre", "quattro", "cinque"]);
        let mut rng = StdRng::seed_from_u64(5);
        let phrase = generate(&words, 5, " ", &mut rng).unwrap();
        assert_eq!(phrase.split(' ').count(), 5);
        assert!(!phrase.contains('-'));
    }

    #[test]
    fn samples_with_replacement() {
        // Without replacement "left-left" could never come out.
        let words = collection(&["left", "right"]);
        let mut rng = StdRng::seed_from_u64(0);
        let repeated = (0..64)
            .map(|_| generate(&words, 2, "-", &mut rng).unwrap())
            .any(|phrase| phrase == "left-left" || phrase == "right-right");
        assert!(repeated, "never drew a repeated word in 64 tries");
    }

    #[test]
    fn insufficient_words_is_an_error() {
        let words = collection(&["left", "right"]);
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate(&words, 5, "-", &mut rng).unwrap_err();
        assert!(matches!(err, AppError::InsufficientWords { requested: 5, available: 2 }));
    }

    #[test]
    fn exact_size_collection_is_enough() {
        let words = collection(&["apple", "banana", "cherry"]);
        let mut rng = StdRng::seed_from_u64(9);
        let phrase = generate(&words, 3, "-", &mut rng).unwrap();
        assert_eq!(phrase.split('-').count(), 3);
    }

    #[test]
    fn zero_words_is_empty_phrase() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(generate(&[], 0, "-", &mut rng).unwrap(), "");
    }

    #[test]
    fn entropy_scales_with_count_and_size() {
        assert!((entropy_bits(1024, 5) - 50.0).abs() < 1e-9);
        assert!((entropy_bits(2, 5) - 5.0).abs() < 1e-9);
        assert_eq!(entropy_bits(1, 5), 0.0);
        assert_eq!(entropy_bits(0, 5), 0.0);
        let eff = entropy_bits(7776, 6);
        assert!((eff - 77.55).abs() < 0.01, "eff = {eff}");
    }
}
