//! Character-level lexing of LDL source.
//!
//! [`tokenize`] turns the whole source into [`Token`]s with byte spans.
//! Whitespace, newlines and comments stay in the stream as trivia so the
//! parser can report what it actually found. A bad character or literal is
//! recorded and skipped, so one call reports every lexical error.

use winnow::{
    Parser as _,
    ascii::{digit0, digit1},
    combinator::{alt, cut_err, not, opt, peek, preceded, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// What went wrong inside a literal or comment, carried as winnow context.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexFailure {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Where the literal began; the error position closes the span.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexFailure>>;

/// Parse a bracketed string literal: `[any text except a closing bracket]`.
///
/// Line endings inside the string are normalized to `\n`.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    '['.parse_next(input)?;

    cut_err(terminated(take_while(0.., |c: char| c != ']'), ']'))
        .context(LexFailure {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `]`"),
            start: start_pos,
        })
        .map(|content: &str| Token::StringLiteral(normalize_newlines(content)))
        .parse_next(input)
}

fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse a signed decimal: `-? DIGIT+ ('.' DIGIT*)?`.
///
/// There is no exponent form, so the only way to leave the finite `f64` range
/// is an overlong digit string, which is reported as E003.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    let text = (opt('-'), digit1, opt(('.', digit0)))
        .take()
        .parse_next(input)?;

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Token::Number(value)),
        _ => Err(ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            LexFailure {
                code: ErrorCode::E003,
                message: "number out of range",
                help: Some("numbers must fit in a 64-bit float"),
                start: start_pos,
            },
        ))),
    }
}

fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse a `/* ... */` comment. Block comments do not nest.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    "/*".parse_next(input)?;

    let body: IResult<'a, &'a str> = terminated(take_until(0.., "*/"), "*/").parse_next(input);
    match body {
        Ok(content) => Ok(Token::BlockComment(content)),
        Err(_) => {
            // The comment swallows the rest of the file.
            input.finish();
            Err(ErrMode::Cut(ContextError::new().add_context(
                input,
                &input.checkpoint(),
                LexFailure {
                    code: ErrorCode::E004,
                    message: "unterminated block comment",
                    help: Some("add closing `*/`"),
                    start: start_pos,
                },
            )))
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Returns `true` when `text` lexes as a single identifier token.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(char::is_alphabetic)
        && chars.all(is_ident_char)
        && Token::keyword(text).is_none()
}

/// One of the nine reserved words, not directly followed by an identifier
/// character: `letter` is an identifier, `let` is not.
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((
            literal("using"),
            literal("as"),
            literal("let"),
            literal("be"),
            literal("position"),
            literal("at"),
            literal("from"),
            literal("connect"),
            literal("to"),
        )),
        peek(not(one_of(is_ident_char))),
    )
    .verify_map(Token::keyword)
    .parse_next(input)
}

/// A Unicode letter followed by letters or digits. Dotted names are split
/// into identifier and [`Token::Dot`] tokens.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., is_ident_char)
        .verify(|s: &str| s.chars().next().is_some_and(char::is_alphabetic))
        .map(Token::Identifier)
        .parse_next(input)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '.'.value(Token::Dot),
        ','.value(Token::Comma),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
    ))
    .parse_next(input)
}

/// A newline, or a run of any other whitespace.
fn spacing<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '\n'.value(Token::Newline),
        take_while(1.., |c: char| c.is_whitespace() && c != '\n').value(Token::Whitespace),
    ))
    .parse_next(input)
}

fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    // Order matters: comments before `/`-free tokens, keywords before
    // identifiers, numbers before punctuation.
    let token = alt((
        line_comment,
        block_comment,
        string_literal,
        keyword,
        number_literal,
        identifier,
        punctuation,
        spacing,
    ))
    .parse_next(input)?;

    let span = Span::new(start_pos..input.current_token_start());
    Ok(PositionedToken::new(token, span))
}

/// Builds the diagnostic for a failed token that ended at `error_pos`.
///
/// Failures without [`LexFailure`] context are stray characters (E002).
fn lex_diagnostic(err: ErrMode<ContextError<LexFailure>>, source: &str, error_pos: usize) -> Diagnostic {
    let failure = match &err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next(),
        ErrMode::Incomplete(_) => None,
    };

    match failure {
        Some(failure) => {
            let diag = Diagnostic::error(failure.message)
                .with_code(failure.code)
                .with_label(Span::new(failure.start..error_pos), failure.code.description());
            match failure.help {
                Some(help) => diag.with_help(help),
                None => diag,
            }
        }
        None => {
            let found = source[error_pos..].chars().next();
            let width = found.map_or(1, char::len_utf8);
            let message = match found {
                Some(c) => format!("unexpected character `{c}`"),
                None => "unexpected end of input".to_string(),
            };
            Diagnostic::error(message)
                .with_code(ErrorCode::E002)
                .with_label(Span::new(error_pos..error_pos + width), ErrorCode::E002.description())
        }
    }
}

/// Tokenize source text, collecting every lexical error in one pass.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per bad character,
/// unterminated literal or comment, and out of range number.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();
    let mut diagnostics = DiagnosticCollector::new();

    while !input.is_empty() {
        let token_start = input.current_token_start();
        match positioned_token(&mut input) {
            Ok(token) => tokens.push(token),
            Err(err) => {
                let error_pos = input.current_token_start();
                diagnostics.emit(lex_diagnostic(err, source, error_pos));

                // Cut errors consumed their text already; a stray character
                // has not, so step over it.
                if error_pos == token_start && !input.is_empty() {
                    input.next_token();
                }
            }
        }
    }

    diagnostics.finish(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        let positioned = result.unwrap();
        assert_eq!(positioned.token, expected);
    }

    fn significant(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("Should tokenize")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords() {
        test_single_token("using", Token::Using);
        test_single_token("as", Token::As);
        test_single_token("let", Token::Let);
        test_single_token("be", Token::Be);
        test_single_token("position", Token::Position);
        test_single_token("at", Token::At);
        test_single_token("from", Token::From);
        test_single_token("connect", Token::Connect);
        test_single_token("to", Token::To);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        test_single_token("letter", Token::Identifier("letter"));
        test_single_token("attic", Token::Identifier("attic"));
        test_single_token("tower", Token::Identifier("tower"));
        test_single_token("be2", Token::Identifier("be2"));

        let tokens = tokenize("let e1").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token, Token::Let);
        assert_eq!(tokens[1].token, Token::Whitespace);
        assert_eq!(tokens[2].token, Token::Identifier("e1"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("e1"));
        assert!(is_identifier("Block"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1e"));
        assert!(!is_identifier("a_b"));
        assert!(!is_identifier("connect"));
    }

    #[test]
    fn test_identifiers() {
        test_single_token("block", Token::Identifier("block"));
        test_single_token("Rail2", Token::Identifier("Rail2"));
        test_single_token("Straße", Token::Identifier("Straße"));
    }

    #[test]
    fn test_underscore_is_not_an_identifier_character() {
        let err = tokenize("my_block").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
        assert_eq!(err.offset(), Some(2));
    }

    #[test]
    fn test_dotted_names_lex_as_separate_tokens() {
        assert_eq!(
            significant("game.blocks.Block"),
            vec![
                Token::Identifier("game"),
                Token::Dot,
                Token::Identifier("blocks"),
                Token::Dot,
                Token::Identifier("Block"),
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        test_single_token(".", Token::Dot);
        test_single_token(",", Token::Comma);
        test_single_token("(", Token::LeftParen);
        test_single_token(")", Token::RightParen);
    }

    #[test]
    fn test_numbers() {
        test_single_token("0", Token::Number(0.0));
        test_single_token("42", Token::Number(42.0));
        test_single_token("-7", Token::Number(-7.0));
        test_single_token("2.5", Token::Number(2.5));
        test_single_token("-0.125", Token::Number(-0.125));
        test_single_token("5.", Token::Number(5.0));
    }

    #[test]
    fn test_leading_dot_is_not_part_of_number() {
        assert_eq!(significant(".5"), vec![Token::Dot, Token::Number(5.0)]);
    }

    #[test]
    fn test_number_out_of_range() {
        let huge = "9".repeat(400);
        let err = tokenize(&huge).unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E003));
        assert_eq!(diag.primary_span(), Some(Span::new(0..400)));
    }

    #[test]
    fn test_lone_minus_is_unexpected() {
        let err = tokenize("- 1").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_string_literals() {
        test_single_token("[hello world]", Token::StringLiteral("hello world".to_string()));
        test_single_token("[]", Token::StringLiteral(String::new()));
        test_single_token(
            "[quotes \"and\" (parens)]",
            Token::StringLiteral("quotes \"and\" (parens)".to_string()),
        );
    }

    #[test]
    fn test_string_newline_normalization() {
        test_single_token("[a\r\nb]", Token::StringLiteral("a\nb".to_string()));
        test_single_token("[a\rb]", Token::StringLiteral("a\nb".to_string()));
        test_single_token("[a\nb]", Token::StringLiteral("a\nb".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("let s be Sign([oops)").unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.primary_span(), Some(Span::new(14..20)));
        assert_eq!(diag.help(), Some("add closing `]`"));
    }

    #[test]
    fn test_stray_close_bracket() {
        let err = tokenize("]").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert_eq!(diag.message(), "unexpected character `]`");
    }

    #[test]
    fn test_stray_multibyte_character_span() {
        let err = tokenize("a €").unwrap_err();
        assert_eq!(err.diagnostics()[0].primary_span(), Some(Span::new(2..5)));
    }

    #[test]
    fn test_comments() {
        test_single_token("// note", Token::LineComment(" note"));
        test_single_token("/* a\nb */", Token::BlockComment(" a\nb "));
        test_single_token("/**/", Token::BlockComment(""));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("let /* never closed").unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E004));
        assert_eq!(diag.primary_span(), Some(Span::new(4..19)));
    }

    #[test]
    fn test_comments_between_tokens() {
        assert_eq!(
            significant("e1/*x*/./* y */c1 // tail\nto"),
            vec![
                Token::Identifier("e1"),
                Token::Dot,
                Token::Identifier("c1"),
                Token::To,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("let e1 be Box(1.5)").unwrap();
        let spans: Vec<_> = tokens
            .iter()
            .filter(|t| !t.is_trivia())
            .map(|t| t.span.range())
            .collect();
        assert_eq!(spans, vec![0..3, 4..6, 7..9, 10..13, 13..14, 14..17, 17..18]);
    }

    #[test]
    fn test_multiple_errors_reported() {
        let err = tokenize("let # be $").unwrap_err();

        let offsets: Vec<_> = err
            .diagnostics()
            .iter()
            .filter_map(|d| d.primary_span())
            .map(|s| s.start())
            .collect();
        assert_eq!(offsets, vec![4, 9]);
    }

    proptest! {
        #[test]
        fn lexer_never_panics(source in "\\PC*") {
            let _ = tokenize(&source);
        }

        #[test]
        fn token_spans_cover_input(source in "[a-z0-9 ,.()\\n\\[\\]-]{0,64}") {
            if let Ok(tokens) = tokenize(&source) {
                let mut offset = 0;
                for token in &tokens {
                    prop_assert_eq!(token.span.start(), offset);
                    offset = token.span.end();
                }
                prop_assert_eq!(offset, source.len());
            }
        }
    }
}
