//! Text cleanup for extracted article content.
//!
//! [`clean`] is a pure, total function: it never fails and is idempotent,
//! so the pipeline may clean already-cleaned text freely. The substitution
//! order is load-bearing for idempotence:
//!
//! 1. boilerplate markers remove the match and the rest of its line
//! 2. citation marks and source-link artifacts are deleted in place
//! 3. whitespace is normalized (trailing spaces, newline runs, space runs)
//!
//! Boilerplate patterns join their words with `\s+` so whitespace
//! normalization can never manufacture a match that the first pass missed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing-boilerplate markers. A match removes the matched span and
/// everything after it on that line.
static BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)subscribe\s+to\s+our\s+newsletter.*",
        r"(?i)sign\s+up\s+for\s+our\s+newsletter.*",
        r"(?i)share\s+this\s+article.*",
        r"(?i)share\s+on\s+(facebook|twitter|pinterest).*",
        r"(?i)follow\s+us\s+on.*",
        r"(?i)we\s+use\s+cookies.*",
        r"(?i)cookie\s+policy.*",
        r"(?i)privacy\s+policy.*",
        r"(?i)terms\s+of\s+use.*",
        r"(?i)all\s+rights\s+reserved.*",
        r"(?i)copyright\s+©.*",
        r"©\s*\d{4}.*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// `(1)` / `(2, 3)`-style citation marks left behind by medical sites.
static CITATION_MARKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d+(?:,\s*\d+)*\)").unwrap());

/// Inline source-link artifacts that survive text extraction.
static SOURCE_ARTIFACTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)trusted\s+source", r"(?i)view\s+source"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static PERIOD_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+([.,!?;:])").unwrap());
static TRAILING_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());
static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Normalize whitespace and strip known boilerplate from extracted text.
///
/// Idempotent: `clean(clean(x)) == clean(x)` for all inputs.
pub fn clean(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").replace('\r', "\n");

    for pattern in BOILERPLATE.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out = CITATION_MARKS.replace_all(&out, "").into_owned();
    for pattern in SOURCE_ARTIFACTS.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }

    out = SPACE_BEFORE_PUNCT.replace_all(&out, "$1").into_owned();
    out = PERIOD_RUNS.replace_all(&out, ".").into_owned();
    out = TRAILING_SPACES.replace_all(&out, "\n").into_owned();
    out = NEWLINE_RUNS.replace_all(&out, "\n\n").into_owned();
    out = SPACE_RUNS.replace_all(&out, " ").into_owned();

    out.trim().to_string()
}
