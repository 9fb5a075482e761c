use nom::{
    branch::alt,
    bytes::complete::{take_while1},
    combinator::{map},
    IResult,
};
use crate::token::{RawToken, Span};

/// Word characters are Unicode letters and digits plus `_`.
/// Everything else is a word boundary.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn raw_token(input: &str) -> IResult<&str, RawToken<'_>> {
    alt((
        map(take_while1(is_word_char), RawToken::Word),
        map(take_while1(|c: char| !is_word_char(c)), RawToken::Gap),
    ))(input)
}

/// Splits `original_input` into alternating word and gap runs with byte spans.
pub fn scan_with_spans(original_input: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original_input;
    let mut result = Vec::new();

    while !input.is_empty() {
        match raw_token(input) {
            Ok((next_input, token)) => {
                let start = original_input.len() - input.len();
                let len = input.len() - next_input.len();
                result.push((Span::new(start, start + len), token));
                input = next_input;
            }
            // Both branches together accept any character, so this is unreachable
            // for non-empty input; stop rather than loop.
            Err(_) => break,
        }
    }

    result
}

/// Byte offsets where a word run begins.
pub fn word_starts(input: &str) -> Vec<usize> {
    scan_with_spans(input)
        .into_iter()
        .filter_map(|(span, token)| match token {
            RawToken::Word(_) => Some(span.start),
            RawToken::Gap(_) => None,
        })
        .collect()
}

/// True when no word character touches `end` from the right.
pub fn is_word_end(input: &str, end: usize) -> bool {
    input[end..].chars().next().map_or(true, |c| !is_word_char(c))
}
