//! Text normalisation: fix the spacing artefacts Bangla text picks up on its
//! way out of a PDF text layer or an OCR engine.
//!
//! ## Two paths
//!
//! Whitespace is always collapsed first. After that, a configured
//! [`WordTokenizer`] gets the first attempt: its tokens are joined with
//! single spaces and returned as-is. Without a tokenizer, or when it fails,
//! the rule-based heuristic runs instead:
//!
//! 1. De-glue Bangla characters that extraction split with whitespace
//! 2. Insert a space after `।` `,` `;` `:` `!` `?`
//! 3. Pad the conjunctions `এবং`, `ও`, `কিন্তু` with spaces
//! 4. Collapse whitespace again
//!
//! The de-glue step is proximity-only. It cannot tell a spurious space
//! inside a word from a real word boundary, so every space between two
//! Bangla characters goes; step 3 then puts back the boundaries around the
//! most common conjunctions.

use crate::error::TokenizeError;
use crate::output::NormalizerPath;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into an ordered sequence of word tokens.
pub trait WordTokenizer: Send + Sync {
    /// Short name used in logs and [`NormalizerPath::Tokenizer`].
    fn name(&self) -> &str;

    /// Split whitespace-normalised text into word tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError>;
}

/// Word tokenizer based on Unicode (UAX #29) word boundaries.
///
/// Bengali vowel signs, hasanta and nukta stay attached to their base
/// consonant; punctuation such as `।` becomes its own token.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl WordTokenizer for UnicodeWordTokenizer {
    fn name(&self) -> &str {
        "unicode"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        Ok(text
            .split_word_bounds()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Result of [`normalize`]: the cleaned text and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub path: NormalizerPath,
}

/// Normalise raw extracted text.
///
/// Empty or whitespace-only input yields an empty string on either path.
pub fn normalize(raw: &str, tokenizer: Option<&dyn WordTokenizer>) -> Normalized {
    let text = collapse_whitespace(raw);

    if let Some(tokenizer) = tokenizer {
        match tokenizer.tokenize(&text) {
            Ok(tokens) => {
                debug!("Tokenizer '{}' produced {} tokens", tokenizer.name(), tokens.len());
                return Normalized {
                    text: tokens.join(" "),
                    path: NormalizerPath::Tokenizer(tokenizer.name().to_string()),
                };
            }
            Err(e) => {
                warn!("{}; falling back to rule-based spacing", e);
            }
        }
    }

    Normalized {
        text: clean_with_rules(&text),
        path: NormalizerPath::Rules,
    }
}

/// Apply the rule-based Bangla spacing heuristic.
///
/// Input is collapsed first, so this is safe to call on raw text.
pub fn clean_with_rules(input: &str) -> String {
    let text = collapse_whitespace(input);
    let text = deglue_bangla(&text);
    let text = space_after_punctuation(&text);
    let text = separate_conjunctions(&text);
    collapse_whitespace(&text)
}

// ── Whitespace ───────────────────────────────────────────────────────────────

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Rule 1: De-glue Bangla characters ────────────────────────────────────────

/// `true` for characters in the Bengali block, U+0980–U+09FF.
pub fn is_bangla(c: char) -> bool {
    ('\u{0980}'..='\u{09FF}').contains(&c)
}

/// Drop every whitespace run that sits between two Bangla characters.
///
/// Single forward pass: a run is dropped when the last character already
/// emitted and the first character after the run are both Bangla. Dropped
/// runs never expose a new pair that a later scan would need to revisit, so
/// the result equals the fixed point of repeated pairwise merging.
pub fn deglue_bangla(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !c.is_whitespace() {
            out.push(c);
            continue;
        }

        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }

        let before = out.chars().next_back().is_some_and(is_bangla);
        let after = chars.peek().is_some_and(|&(_, next)| is_bangla(next));
        if !(before && after) {
            out.push_str(&input[start..end]);
        }
    }

    out
}

// ── Rule 2: Space after punctuation ──────────────────────────────────────────

static RE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"([।,;:!?])").unwrap());

fn space_after_punctuation(input: &str) -> Cow<'_, str> {
    RE_PUNCTUATION.replace_all(input, "$1 ")
}

// ── Rule 3: Separate conjunctions ────────────────────────────────────────────

/// Conjunctions padded with spaces, in application order.
pub const CONJUNCTIONS: [&str; 3] = ["এবং", "ও", "কিন্তু"];

/// `(glued-before, glued-after)` pattern pair per conjunction.
static RE_CONJUNCTIONS: Lazy<Vec<(Regex, Regex)>> = Lazy::new(|| {
    CONJUNCTIONS
        .iter()
        .map(|conj| {
            let before = Regex::new(&format!(r"(\S){conj}")).unwrap();
            let after = Regex::new(&format!(r"{conj}(\S)")).unwrap();
            (before, after)
        })
        .collect()
});

fn separate_conjunctions(input: &str) -> String {
    let mut text = input.to_string();
    for (conj, (before, after)) in CONJUNCTIONS.iter().zip(RE_CONJUNCTIONS.iter()) {
        let padded_before = format!("$1 {conj}");
        let padded_after = format!("{conj} $1");
        text = before.replace_all(&text, padded_before.as_str()).into_owned();
        text = after.replace_all(&text, padded_after.as_str()).into_owned();
    }
    text
}

// ── Tests ────────────────────────────────────────────────────────────────────
