//! Raw lexemes for each lexical state, recognised by logos scanners.
//!
//! These scanners only find the extent of the next lexeme. Whether it is a
//! metacharacter, a literal or something the dialect does not know is
//! decided by the [`Lexer`](super::Lexer) adapter.

use logos::Logos;

/// Lexemes of the pattern body outside any class.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PatternLexeme {
    #[token("\\")]
    Backslash,
    #[token("(")]
    GroupOpen,
    #[token("(?:")]
    NonCapturing,
    #[token("(?>")]
    Atomic,
    #[token("(?=")]
    PosLookahead,
    #[token("(?!")]
    NegLookahead,
    #[token("(?<=")]
    PosLookbehind,
    #[token("(?<!")]
    NegLookbehind,
    #[token("(?<")]
    AngleNamed,
    #[token("(?'")]
    QuotedNamed,
    #[token("(?P<")]
    PythonNamed,
    #[token("(?P=")]
    PythonNamedRef,
    #[token("(?&")]
    RecursiveNamedRef,
    #[token("(?(")]
    Conditional,
    #[token("(?#")]
    InlineComment,
    #[token("(?R")]
    Recurse,
    #[regex(r"\(\?[+-]?[0-9]+")]
    NumberedRef,
    #[token("(?")]
    Options,
    #[token(")")]
    GroupClose,
    #[token("[")]
    ClassOpen,
    #[token("]")]
    ClassClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("|")]
    Bar,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("?")]
    Quest,
    #[token(".")]
    Dot,
    #[token("^")]
    Caret,
    #[token("$")]
    Dollar,
    #[token("#")]
    Hash,
    #[regex(r"[ \t\n\r\x0B\x0C]+")]
    Whitespace,
    #[regex(r"[^\\()\[\]{}|*+?.^$# \t\n\r\x0B\x0C]")]
    Literal,
}

/// Lexemes inside `[...]`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ClassLexeme {
    #[token("\\")]
    Backslash,
    #[token("[")]
    Open,
    #[token("[:")]
    PosixOpen,
    #[token("[.")]
    CollatingOpen,
    #[token("[=")]
    EquivalenceOpen,
    #[token("]")]
    Close,
    #[token("^")]
    Caret,
    #[token("-")]
    Minus,
    #[token("&&")]
    AndAnd,
    #[token("&")]
    Amp,
    #[token("#")]
    Hash,
    #[regex(r"[ \t\n\r\x0B\x0C]+")]
    Whitespace,
    #[regex(r"[^\\\[\]^\-&# \t\n\r\x0B\x0C]")]
    Literal,
}

/// Lexemes between `{` and `}` of a counted quantifier.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum QuantifierLexeme {
    #[regex(r"[0-9]+")]
    Number,
    #[token(",")]
    Comma,
    #[token("}")]
    Close,
}

/// Lexemes after `(?` in an inline options group.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OptionsLexeme {
    #[regex(r"[a-zA-Z]+")]
    On,
    #[regex(r"-[a-zA-Z]*")]
    Off,
    #[token(":")]
    Colon,
    #[token(")")]
    Close,
}

/// Lexemes of group names, group references and conditions.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NameLexeme {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,
    #[regex(r"[+-]?[0-9]+")]
    Number,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token("'")]
    Quote,
    #[token("}")]
    BraceClose,
    #[token(")")]
    ParenClose,
}

/// Lexemes of `\p{...}`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PropertyLexeme {
    #[token("{")]
    Open,
    #[token("}")]
    Close,
    #[token("^")]
    Caret,
    #[token("=")]
    Eq,
    #[regex(r"[A-Za-z0-9_&. \-]+")]
    Name,
}

/// Lexemes of `\N{...}`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NamedCharLexeme {
    #[token("{")]
    Open,
    #[token("}")]
    Close,
    #[regex(r"[^{}]+")]
    Name,
}

/// Lexemes of a POSIX `[:name:]` bracket expression.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BracketLexeme {
    #[token("^")]
    Caret,
    #[regex(r"[A-Za-z]+")]
    Name,
    #[token(":]")]
    End,
}

/// Scan one lexeme at the start of `source`.
///
/// Returns the lexeme (or `None` when the scanner rejects the input) and
/// the byte length it covers.
pub(super) fn scan<'s, T>(source: &'s str) -> Option<(Option<T>, usize)>
where
    T: Logos<'s, Source = str>,
    T::Extras: Default,
{
    let mut lexer = T::lexer(source);
    let result = lexer.next()?;
    Some((result.ok(), lexer.span().end))
}
