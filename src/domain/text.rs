//! Text gathering and normalization for scraped page fragments.
//!
//! Raw inner text from the calendar pages arrives with embedded line breaks,
//! uneven indentation, and duplicated whitespace. Everything that ends up on
//! a printed sheet goes through [`clean`], which reduces any source shape to
//! a single-line, single-spaced string.

/// Leading label carried by the civil date block on the source page.
pub const NEW_STYLE_LABEL: &str = "Новый стиль";
/// Leading label carried by the Julian date block on the source page.
pub const OLD_STYLE_LABEL: &str = "Старый стиль";

/// Inner texts of every node matched by one page query, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTexts(Vec<String>);

impl ElementTexts {
    pub fn new(texts: Vec<String>) -> Self {
        Self(texts)
    }

    /// Joined text of all matched nodes. Empty when nothing matched.
    pub fn raw(&self) -> String {
        self.0.join(" ")
    }
}

/// The shapes a field's text can be gathered from.
#[derive(Debug, Clone)]
pub enum TextSource {
    /// One page query, possibly matching several nodes.
    Element(ElementTexts),
    /// Several page queries, each contributing its joined text.
    Elements(Vec<ElementTexts>),
    /// A plain string, used verbatim.
    Literal(String),
    /// Several plain strings.
    Literals(Vec<String>),
}

impl TextSource {
    fn into_raw_items(self) -> Vec<String> {
        match self {
            Self::Element(texts) => vec![texts.raw()],
            Self::Elements(list) => list.iter().map(ElementTexts::raw).collect(),
            Self::Literal(text) => vec![text],
            Self::Literals(texts) => texts,
        }
    }
}

/// Flattens a source into one single-spaced line.
///
/// Line breaks become spaces, items are trimmed, empty items are dropped,
/// and any surviving whitespace run collapses to a single space. An empty
/// source yields an empty string.
pub fn collect(source: TextSource) -> String {
    let joined = source
        .into_raw_items()
        .into_iter()
        .map(|item| item.replace(['\n', '\r'], " ").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    collapse_whitespace(&joined)
}

/// Collects a source and optionally capitalizes each word.
pub fn clean(source: TextSource, capitalize: bool) -> String {
    let collected = collect(source);
    if capitalize {
        capitalize_words(&collected)
    } else {
        collected
    }
}

/// Uppercases the first character of each word and lowercases the rest.
///
/// Words are split on single spaces; empty words stay empty so the original
/// spacing survives the round trip.
pub fn capitalize_words(input: &str) -> String {
    input
        .split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes a leading style label, case-insensitively, along with the
/// whitespace that follows it. Inputs without the label pass through
/// unchanged, so repeated application is a no-op.
pub fn strip_style_label(input: &str, label: &str) -> String {
    match strip_prefix_ignore_case(input, label) {
        Some(rest) => rest.trim_start().to_string(),
        None => input.to_string(),
    }
}

fn collapse_whitespace(input: &str) -> String {
    let mut collapsed = String::with_capacity(input.len());
    let mut in_run = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            in_run = true;
            continue;
        }
        if in_run && !collapsed.is_empty() {
            collapsed.push(' ');
        }
        in_run = false;
        collapsed.push(ch);
    }
    collapsed
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut capitalized = String::with_capacity(word.len());
    capitalized.extend(first.to_uppercase());
    for ch in chars {
        capitalized.extend(ch.to_lowercase());
    }
    capitalized
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = input.chars();
    for expected in prefix.chars() {
        let actual = rest.next()?;
        if !chars_eq_ignore_case(actual, expected) {
            return None;
        }
    }
    Some(rest.as_str())
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
