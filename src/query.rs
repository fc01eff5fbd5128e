//! Search query tokenization and cascading relaxation.

use serde::{Deserialize, Serialize};

/// A keyword search query, decomposed into ordered tokens.
///
/// Tokens are whitespace-separated, trimmed, and non-empty; insertion order
/// is preserved and duplicates are retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    raw: String,
    tokens: Vec<String>,
}

impl SearchQuery {
    /// Creates a query from raw keyword text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tokens = raw.split_whitespace().map(str::to_string).collect();
        Self { raw, tokens }
    }

    /// Returns the raw query text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the keyword tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns true if the query contains no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the lazy sequence of progressively relaxed candidate queries.
    ///
    /// For tokens `[k0 .. kn-1]` the sequence is the full phrase, then the
    /// phrase with the last token dropped, down to `k0` alone; if none of
    /// those hit, each single token in original order. At most `2n`
    /// candidates, every one non-empty. The iterator is restartable by
    /// calling this again.
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            tokens: &self.tokens,
            phase: Phase::PrefixJoin,
            index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    PrefixJoin,
    SingleToken,
}

/// Lazy iterator over relaxed candidate queries. See [`SearchQuery::candidates`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    tokens: &'a [String],
    phase: Phase,
    index: usize,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let n = self.tokens.len();
        match self.phase {
            Phase::PrefixJoin => {
                if self.index < n {
                    let keep = n - self.index;
                    self.index += 1;
                    Some(self.tokens[..keep].join(" "))
                } else {
                    self.phase = Phase::SingleToken;
                    self.index = 0;
                    self.next()
                }
            }
            Phase::SingleToken => {
                let token = self.tokens.get(self.index)?;
                self.index += 1;
                Some(token.clone())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.tokens.len();
        let consumed = match self.phase {
            Phase::PrefixJoin => self.index,
            Phase::SingleToken => n + self.index,
        };
        let remaining = 2 * n - consumed;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}
