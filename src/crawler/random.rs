//! Random single-problem pick

use rand::seq::SliceRandom;
use rand::Rng;

/// Listing entries considered for a random pick
pub const RANDOM_POOL_SIZE: u32 = 100;

/// Well-known free easy problems, used when the listing cannot be read
pub const FALLBACK_EASY_SLUGS: &[&str] = &[
    "two-sum",
    "palindrome-number",
    "roman-to-integer",
    "longest-common-prefix",
    "valid-parentheses",
    "merge-two-sorted-lists",
    "remove-duplicates-from-sorted-array",
    "remove-element",
    "find-the-index-of-the-first-occurrence-in-a-string",
    "search-insert-position",
    "length-of-last-word",
    "plus-one",
    "add-binary",
    "sqrt-x",
    "climbing-stairs",
    "remove-duplicates-from-sorted-list",
    "merge-sorted-array",
    "same-tree",
    "symmetric-tree",
    "maximum-depth-of-binary-tree",
    "binary-tree-inorder-traversal",
    "convert-sorted-array-to-binary-search-tree",
    "balanced-binary-tree",
    "minimum-depth-of-binary-tree",
    "path-sum",
    "pascals-triangle",
    "best-time-to-buy-and-sell-stock",
    "valid-palindrome",
    "single-number",
    "linked-list-cycle",
    "intersection-of-two-linked-lists",
    "excel-sheet-column-title",
    "majority-element",
    "reverse-bits",
    "number-of-1-bits",
    "happy-number",
    "remove-linked-list-elements",
    "count-primes",
    "isomorphic-strings",
    "reverse-linked-list",
    "contains-duplicate",
    "contains-duplicate-ii",
    "invert-binary-tree",
    "power-of-two",
    "implement-queue-using-stacks",
    "palindrome-linked-list",
    "valid-anagram",
    "binary-tree-paths",
    "add-digits",
    "ugly-number",
    "missing-number",
    "first-bad-version",
    "move-zeroes",
    "word-pattern",
    "nim-game",
    "range-sum-query-immutable",
    "power-of-three",
];

/// Picks one slug uniformly, or `None` for an empty slice
pub fn pick_slug<'a, T, R>(candidates: &'a [T], rng: &mut R) -> Option<&'a str>
where
    T: AsRef<str>,
    R: Rng + ?Sized,
{
    candidates.choose(rng).map(AsRef::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_empty_pool_yields_nothing() {
        let empty: [String; 0] = [];
        assert_eq!(pick_slug(&empty, &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn test_single_candidate_is_always_picked() {
        let pool = vec!["only-one".to_string()];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            assert_eq!(pick_slug(&pool, &mut rng), Some("only-one"));
        }
    }

    #[test]
    fn test_picks_come_from_the_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let slug = pick_slug(FALLBACK_EASY_SLUGS, &mut rng).unwrap();
            assert!(FALLBACK_EASY_SLUGS.contains(&slug));
        }
    }

    #[test]
    fn test_fallback_list_has_no_duplicates() {
        let unique: HashSet<_> = FALLBACK_EASY_SLUGS.iter().collect();
        assert_eq!(unique.len(), FALLBACK_EASY_SLUGS.len());
    }
}
