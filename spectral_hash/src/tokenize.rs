// Source tokenizer for the token co-occurrence graph.
//
// Deliberately language-agnostic: it recognizes identifiers, numbers,
// quoted literals, and punctuation, and drops whitespace and comments
// (`//`, `/* */`, and `#` line comments that are not attributes). The
// resulting token stream is what graph.rs turns into nodes and edges.
//
// String and char literals collapse to a single shared token so that
// changing message text does not change a program's structural fingerprint.

/// Label shared by every string or char literal.
pub const LITERAL_TOKEN: &str = "<lit>";

/// Two-character operators kept as one token.
const COMPOUND_OPERATORS: [&str; 16] = [
    "==", "!=", "<=", ">=", "->", "=>", "::", "&&", "||", "+=", "-=", "*=", "/=", "<<", ">>",
    "..",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Number,
    Literal,
    Punct,
}

/// One lexical token, borrowing its text from the source where possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Split `source` into tokens. Never fails; unterminated literals and
/// comments simply run to the end of input.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let rest = &source[start..];

        // Comments
        if rest.starts_with("//") || (ch == '#' && !rest.starts_with("#[") && !rest.starts_with("#!"))
        {
            let end = rest.find('\n').map_or(source.len(), |i| start + i);
            advance_to(&mut chars, end);
            continue;
        }
        if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map_or(source.len(), |i| start + 2 + i + 2);
            advance_to(&mut chars, end);
            continue;
        }

        if ch == '"' {
            let end = literal_end(source, start, '"');
            advance_to(&mut chars, end);
            tokens.push(Token { kind: TokenKind::Literal, text: LITERAL_TOKEN });
            continue;
        }

        if ch == '\'' && is_char_literal(source, start) {
            let end = literal_end(source, start, '\'');
            advance_to(&mut chars, end);
            tokens.push(Token { kind: TokenKind::Literal, text: LITERAL_TOKEN });
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let end = scan_while(source, start, |c| c.is_alphanumeric() || c == '_');
            advance_to(&mut chars, end);
            tokens.push(Token { kind: TokenKind::Ident, text: &source[start..end] });
            continue;
        }

        if ch.is_ascii_digit() {
            let end = scan_while(source, start, |c| c.is_alphanumeric() || c == '_' || c == '.');
            advance_to(&mut chars, end);
            tokens.push(Token { kind: TokenKind::Number, text: &source[start..end] });
            continue;
        }

        let end = match COMPOUND_OPERATORS.iter().find(|op| rest.starts_with(*op)) {
            Some(op) => start + op.len(),
            None => start + ch.len_utf8(),
        };
        advance_to(&mut chars, end);
        tokens.push(Token { kind: TokenKind::Punct, text: &source[start..end] });
    }

    tokens
}

fn advance_to(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, end: usize) {
    while let Some(&(i, _)) = chars.peek() {
        if i >= end {
            break;
        }
        chars.next();
    }
}

/// Byte offset just past the first char at or after `start` failing `pred`.
fn scan_while(source: &str, start: usize, pred: impl Fn(char) -> bool) -> usize {
    source[start..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(source.len(), |(i, _)| start + i)
}

/// End offset (exclusive) of a quoted literal opened at `start`,
/// honoring backslash escapes.
fn literal_end(source: &str, start: usize, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in source[start + 1..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return start + 1 + i + c.len_utf8();
        }
    }
    source.len()
}

/// A `'` opens a char literal only for `'x'` (one scalar, then the closing
/// quote) or `'\…'`; otherwise it is a lifetime tick or a stray quote and is
/// treated as punctuation.
fn is_char_literal(source: &str, start: usize) -> bool {
    let mut rest = source[start + 1..].chars();
    match rest.next() {
        Some('\\') => true,
        Some('\'') | None => false,
        Some(_) => rest.next() == Some('\''),
    }
}
