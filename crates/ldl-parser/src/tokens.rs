use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// A lexical token. Identifiers and comments borrow from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    Using,
    As,
    Let,
    Be,
    Position,
    At,
    From,
    Connect,
    To,

    /// Bracket string contents with line endings normalized to `\n`.
    StringLiteral(String),
    Number(f64),
    Identifier(&'src str),

    Dot,
    Comma,
    LeftParen,
    RightParen,

    /// Text after `//`, up to the newline.
    LineComment(&'src str),
    /// Text between `/*` and `*/`.
    BlockComment(&'src str),

    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Maps a reserved word to its keyword token.
    pub fn keyword(word: &str) -> Option<Token<'static>> {
        let token = match word {
            "using" => Token::Using,
            "as" => Token::As,
            "let" => Token::Let,
            "be" => Token::Be,
            "position" => Token::Position,
            "at" => Token::At,
            "from" => Token::From,
            "connect" => Token::Connect,
            "to" => Token::To,
            _ => return None,
        };
        Some(token)
    }

    /// Whitespace and comments, skipped by the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_) | Token::BlockComment(_)
        )
    }
}

/// A token and its byte span; the item type of the parser's token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Using => write!(f, "using"),
            Token::As => write!(f, "as"),
            Token::Let => write!(f, "let"),
            Token::Be => write!(f, "be"),
            Token::Position => write!(f, "position"),
            Token::At => write!(f, "at"),
            Token::From => write!(f, "from"),
            Token::Connect => write!(f, "connect"),
            Token::To => write!(f, "to"),

            Token::StringLiteral(s) => write!(f, "[{s}]"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::BlockComment(comment) => write!(f, "/*{comment}*/"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
