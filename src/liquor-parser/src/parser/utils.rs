//! Small combinators shared by the parser modules

use nom::{
    bytes::complete::tag,
    character::complete::satisfy,
    combinator::not,
    sequence::terminated,
    IResult, Parser,
};

/// Characters allowed inside an identifier after its first character
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Parse a keyword, ensuring it's not followed by identifier characters
pub(crate) fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| terminated(tag(word), not(satisfy(is_word_char))).parse(input)
}
