//! Parser for LDL source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer)
//! into an ordered list of [`Statement`]s. The public entry point is
//! [`build_statements`].
//!
//! Each keyword block yields one statement per comma-separated pair, spanned
//! from that pair's first token. Once a keyword has been read the block is
//! committed, so errors inside it are reported at the offending token instead
//! of backtracking to the keyword.

use glam::DVec3;
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use ldl_core::{identifier::Id, literal::Literal};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
    statement::Statement,
    tokens::{PositionedToken, Token},
};

/// Attached to parser failures to build the E100/E101 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// What should have come next, e.g. "3D vector". The innermost wins.
    Label(&'static str),
    /// Statement kind for the help line, e.g. "position".
    Statement(&'static str),
}

type Input<'src> = LdlTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
type LdlTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

fn trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

/// Skips whitespace, newlines and comments.
fn skip_trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Parse one token of the given kind after optional trivia, returning its span.
fn token<'src>(expected: Token<'static>) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        skip_trivia.parse_next(input)?;
        any.verify_map(|token: &PositionedToken<'_>| (token.token == expected).then_some(token.span))
            .parse_next(input)
    }
}

/// Parse a single identifier
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<Id>> {
    skip_trivia.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(Id::new(name), token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse a dotted name: `IDENT ("." IDENT)*`
fn dotted_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<Id>> {
    let first = identifier.parse_next(input)?;
    let mut current_id = first.inner().clone();
    let mut unified_span = first.span();

    loop {
        let checkpoint = input.checkpoint();
        if token(Token::Dot).parse_next(input).is_err() {
            input.reset(&checkpoint);
            break;
        }

        let next = identifier
            .context(Context::Label("identifier after `.`"))
            .parse_next(input)?;
        current_id = current_id.create_nested(next.inner());
        unified_span = unified_span.union(next.span());
    }

    Ok(Spanned::new(current_id, unified_span))
}

fn number<'src>(input: &mut Input<'src>) -> IResult<Spanned<f64>> {
    skip_trivia.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Number(value) => Some(Spanned::new(value, token.span)),
        _ => None,
    })
    .context(Context::Label("number"))
    .parse_next(input)
}

/// Parse a 3D vector: `"(" NUMBER "," NUMBER "," NUMBER ")"`
///
/// Backtracks only when the opening parenthesis is missing.
fn vector3<'src>(input: &mut Input<'src>) -> IResult<Spanned<DVec3>> {
    let open = token(Token::LeftParen).parse_next(input)?;

    cut_err(|input: &mut Input<'src>| {
        let x = number.parse_next(input)?;
        token(Token::Comma).parse_next(input)?;
        let y = number.parse_next(input)?;
        token(Token::Comma).parse_next(input)?;
        let z = number.parse_next(input)?;
        let close = token(Token::RightParen).parse_next(input)?;

        Ok(Spanned::new(
            DVec3::new(*x, *y, *z),
            open.union(close),
        ))
    })
    .context(Context::Label("3D vector"))
    .parse_next(input)
}

fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    skip_trivia.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse a constructor argument: `STRING | NUMBER | vector3`
fn literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<Literal>> {
    alt((
        string_literal.map(|s| {
            let span = s.span();
            Spanned::new(Literal::String(s.into_inner()), span)
        }),
        number.map(|n| n.map(|value| Literal::Number(*value))),
        vector3.map(|v| v.map(|value| Literal::Vector(*value))),
    ))
    .context(Context::Label("value"))
    .parse_next(input)
}

/// Parse the argument list of a declaration, including the parentheses.
fn arguments<'src>(input: &mut Input<'src>) -> IResult<(Vec<Spanned<Literal>>, Span)> {
    let open = token(Token::LeftParen)
        .context(Context::Label("`(`"))
        .parse_next(input)?;

    let checkpoint = input.checkpoint();
    if let Ok(close) = token(Token::RightParen).parse_next(input) {
        return Ok((Vec::new(), open.union(close)));
    }
    input.reset(&checkpoint);

    let mut args = vec![literal.parse_next(input)?];
    loop {
        let checkpoint = input.checkpoint();
        if token(Token::Comma).parse_next(input).is_err() {
            input.reset(&checkpoint);
            break;
        }
        args.push(literal.parse_next(input)?);
    }

    let close = token(Token::RightParen)
        .context(Context::Label("`,` or `)`"))
        .parse_next(input)?;

    Ok((args, open.union(close)))
}

/// `IDENT "as" DOTTEDNAME`
fn alias_pair<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let alias = identifier
        .context(Context::Label("alias name"))
        .parse_next(input)?;
    token(Token::As)
        .context(Context::Label("`as`"))
        .parse_next(input)?;
    let class = dotted_name
        .context(Context::Label("class name"))
        .parse_next(input)?;

    let span = alias.span().union(class.span());
    Ok(Spanned::new(Statement::Alias { alias, class }, span))
}

/// `IDENT "be" (IDENT|DOTTEDNAME) "(" (literal ("," literal)*)? ")"`
fn declaration_pair<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let name = identifier
        .context(Context::Label("entity name"))
        .parse_next(input)?;
    token(Token::Be)
        .context(Context::Label("`be`"))
        .parse_next(input)?;
    let class = dotted_name
        .context(Context::Label("class name"))
        .parse_next(input)?;
    let (args, args_span) = arguments.parse_next(input)?;

    let span = name.span().union(args_span);
    Ok(Spanned::new(
        Statement::Declaration { name, class, args },
        span,
    ))
}

/// `IDENT "at" vector3 ("from" IDENT)?`
fn position_pair<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let name = identifier
        .context(Context::Label("entity name"))
        .parse_next(input)?;
    token(Token::At)
        .context(Context::Label("`at`"))
        .parse_next(input)?;
    let position = vector3
        .context(Context::Label("3D vector"))
        .parse_next(input)?;

    let mut span = name.span().union(position.span());

    let checkpoint = input.checkpoint();
    let relative_to = if token(Token::From).parse_next(input).is_ok() {
        let other = identifier
            .context(Context::Label("entity name"))
            .parse_next(input)?;
        span = span.union(other.span());
        Some(other)
    } else {
        input.reset(&checkpoint);
        None
    };

    Ok(Spanned::new(
        Statement::Position {
            name,
            position,
            relative_to,
        },
        span,
    ))
}

/// `IDENT "." IDENT "to" IDENT "." IDENT`
fn connection_pair<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let moved = identifier
        .context(Context::Label("entity name"))
        .parse_next(input)?;
    token(Token::Dot)
        .context(Context::Label("`.`"))
        .parse_next(input)?;
    let moved_connector = identifier
        .context(Context::Label("connector name"))
        .parse_next(input)?;
    token(Token::To)
        .context(Context::Label("`to`"))
        .parse_next(input)?;
    let base = identifier
        .context(Context::Label("entity name"))
        .parse_next(input)?;
    token(Token::Dot)
        .context(Context::Label("`.`"))
        .parse_next(input)?;
    let base_connector = identifier
        .context(Context::Label("connector name"))
        .parse_next(input)?;

    let span = moved.span().union(base_connector.span());
    Ok(Spanned::new(
        Statement::Connection {
            moved,
            moved_connector,
            base,
            base_connector,
        },
        span,
    ))
}

/// Parse `<keyword> pair ("," pair)*`, committing once the keyword matched.
fn statement_block<'src>(
    keyword: Token<'static>,
    kind: &'static str,
    mut pair: impl FnMut(&mut Input<'src>) -> IResult<Spanned<Statement>>,
) -> impl FnMut(&mut Input<'src>) -> IResult<Vec<Spanned<Statement>>> {
    let mut keyword_token = token(keyword);

    move |input: &mut Input<'src>| {
        keyword_token.parse_next(input)?;

        let pairs = |input: &mut Input<'src>| -> IResult<Vec<Spanned<Statement>>> {
            let mut statements = vec![pair(input)?];
            loop {
                let checkpoint = input.checkpoint();
                if token(Token::Comma).parse_next(input).is_err() {
                    input.reset(&checkpoint);
                    return Ok(statements);
                }
                statements.push(pair(input)?);
            }
        };

        cut_err(pairs)
            .context(Context::Statement(kind))
            .parse_next(input)
    }
}

/// Parse one keyword block
fn statement<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Statement>>> {
    alt((
        statement_block(Token::Using, "`using` alias", alias_pair),
        statement_block(Token::Let, "`let` declaration", declaration_pair),
        statement_block(Token::Position, "`position` statement", position_pair),
        statement_block(Token::Connect, "`connect` statement", connection_pair),
    ))
    .parse_next(input)
}

/// `program := stmt* EOF`
fn program<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Statement>>> {
    let mut statements = Vec::new();
    loop {
        skip_trivia.parse_next(input)?;
        if input.eof_offset() == 0 {
            return Ok(statements);
        }

        let block = statement
            .context(Context::Label("`using`, `let`, `position` or `connect`"))
            .parse_next(input)?;
        statements.extend(block);
    }
}

/// Convert a winnow error into a diagnostic pointing at the offending token.
///
/// The innermost [`Context::Label`] names what was expected. When only trivia
/// remains the error is reported as incomplete input at the end of the source.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let expected = context
        .context()
        .find_map(|ctx| match ctx {
            Context::Label(label) => Some(*label),
            Context::Statement(_) => None,
        })
        .unwrap_or("statement");
    let within = context.context().find_map(|ctx| match ctx {
        Context::Statement(kind) => Some(*kind),
        Context::Label(_) => None,
    });

    let position = tokens.len().saturating_sub(current_remaining);
    let offending = tokens
        .get(position..)
        .unwrap_or_default()
        .iter()
        .find(|token| !token.is_trivia());

    let diagnostic = match offending {
        Some(token) => Diagnostic::error(format!("expected {expected}, found `{}`", token.token))
            .with_code(ErrorCode::E100)
            .with_label(token.span, format!("expected {expected}")),
        None => {
            let end = tokens.last().map(|token| token.span.end()).unwrap_or(0);
            Diagnostic::error(format!("expected {expected}, found end of input"))
                .with_code(ErrorCode::E101)
                .with_label(Span::new(end..end), format!("expected {expected}"))
        }
    };

    match within {
        Some(kind) => diagnostic.with_help(format!("while parsing a {kind}")),
        None => diagnostic,
    }
}

/// Build the statement list from tokens
pub fn build_statements<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<Spanned<Statement>>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match program.parse_next(&mut token_slice) {
        Ok(statements) => Ok(statements),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
