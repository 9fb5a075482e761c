use lectio_protocol::VocabEntry;
use crate::scanner::{is_word_char, is_word_end, word_starts};
use crate::token::Span;

/// A vocabulary entry prepared for matching.
#[derive(Debug, Clone)]
pub struct Needle {
    /// Position of the entry in the unit vocabulary (registration order).
    pub entry: usize,
    /// Lower-cased lookup key.
    pub key: String,
    pattern: String,
}

impl Needle {
    /// Entries that do not start and end with a word character can never form
    /// a whole-word match and are skipped.
    pub fn from_entry(entry: usize, vocab: &VocabEntry) -> Option<Self> {
        let pattern = vocab.word.trim();
        let first = pattern.chars().next()?;
        let last = pattern.chars().next_back()?;
        if !is_word_char(first) || !is_word_char(last) {
            return None;
        }
        Some(Self {
            entry,
            key: pattern.to_lowercase(),
            pattern: pattern.to_string(),
        })
    }

    /// Case-insensitive comparison starting at byte `start`.
    /// Returns the end offset in `text` when the whole pattern matches.
    fn match_at(&self, text: &str, start: usize) -> Option<usize> {
        let mut haystack = text[start..].char_indices();
        for expected in self.pattern.chars() {
            let (_, found) = haystack.next()?;
            if found != expected && !found.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
        }
        let end = haystack.next().map_or(text.len(), |(offset, _)| start + offset);
        Some(end)
    }
}

/// One whole-word occurrence of a vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub span: Span,
    pub entry: usize,
    pub key: String,
}

/// Collects every whole-word occurrence of every needle, overlaps included.
pub fn find_candidates(text: &str, needles: &[Needle]) -> Vec<Match> {
    let mut candidates = Vec::new();

    for start in word_starts(text) {
        for needle in needles {
            if let Some(end) = needle.match_at(text, start) {
                if is_word_end(text, end) {
                    candidates.push(Match {
                        span: Span::new(start, end),
                        entry: needle.entry,
                        key: needle.key.clone(),
                    });
                }
            }
        }
    }

    candidates
}

/// Reduces candidates to a non-overlapping set.
///
/// Tie-break order: earliest start, then longest span, then the entry that was
/// registered first in the vocabulary list. Anything overlapping an accepted
/// match is dropped.
pub fn resolve(mut candidates: Vec<Match>) -> Vec<Match> {
    candidates.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.len().cmp(&a.span.len()))
            .then(a.entry.cmp(&b.entry))
    });

    let mut accepted: Vec<Match> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let free = accepted
            .last()
            .map_or(true, |prev| !prev.span.overlaps(&candidate.span));
        if free {
            accepted.push(candidate);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needles(words: &[&str]) -> Vec<Needle> {
        words
            .iter()
            .enumerate()
            .filter_map(|(i, w)| {
                Needle::from_entry(
                    i,
                    &VocabEntry {
                        word: w.to_string(),
                        ..VocabEntry::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_whole_word_only() {
        let found = find_candidates("The cat sat in a category.", &needles(&["cat"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::new(4, 7));

        let found = find_candidates("An art party.", &needles(&["art", "party"]));
        let keys: Vec<&str> = found.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["art", "party"]);
    }

    #[test]
    fn test_case_insensitive_keeps_original_offsets() {
        let found = find_candidates("ZIPPER and Zipper", &needles(&["zipper"]));
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].span, Span::new(11, 17));
        assert!(found.iter().all(|m| m.key == "zipper"));
    }

    #[test]
    fn test_longest_then_first_registered_wins() {
        let text = "I like ice cream a lot.";
        let resolved = resolve(find_candidates(text, &needles(&["ice", "ice cream", "cream"])));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].key, "ice cream");

        // Same span registered twice: the earlier entry keeps it
        let resolved = resolve(find_candidates("Hello there", &needles(&["hello", "HELLO"])));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entry, 0);
    }

    #[test]
    fn test_punctuated_entries_are_skipped() {
        assert!(needles(&["-ing", "", "   "]).is_empty());
        // Inner punctuation is fine
        let found = find_candidates("It's a well-known fact", &needles(&["well-known"]));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_multi_char_lowercase_does_not_fold() {
        // 'İ' lowercases to "i\u{307}", which never equals a plain 'i'
        assert!(find_candidates("İstanbul is big", &needles(&["istanbul"])).is_empty());
        assert!(find_candidates("istanbul is big", &needles(&["İstanbul"])).is_empty());
        assert!(find_candidates("i\u{307}stanbul is big", &needles(&["İstanbul"])).is_empty());

        let found = find_candidates("İSTANBUL is big", &needles(&["İstanbul"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::new(0, "İSTANBUL".len()));
    }
}
