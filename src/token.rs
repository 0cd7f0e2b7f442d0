//! The closed catalog of token kinds produced by the lexer.

use std::fmt;
use std::ops::Range;

/// Kind of a lexical token.
///
/// [`TokenKind::name`] gives the stable identifier used by presentation
/// layers (highlighters, brace matchers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // Literal characters
    Character,
    EscCharacter,
    EscCtrlCharacter,
    CtrlCharacter,
    UnicodeChar,
    HexChar,
    OctChar,
    RedundantEscape,
    BadHexValue,
    BadOctValue,
    BadCharacter,
    Minus,

    // Structure
    GroupBegin,
    GroupEnd,
    ClassBegin,
    ClassEnd,
    LBrace,
    RBrace,
    BracketExpressionBegin,
    BracketExpressionEnd,
    MysqlCharBegin,
    MysqlCharEnd,
    MysqlCharEqBegin,
    MysqlCharEqEnd,

    // Operators and words
    Union,
    Caret,
    Dollar,
    Dot,
    AndAnd,
    Star,
    Plus,
    Quest,
    Colon,
    Gt,
    Lt,
    Eq,
    Quote,
    Comma,
    Number,
    Name,

    // Escapes with meaning beyond a single character
    CharClass,
    Property,
    CategoryShortHand,
    NamedCharacter,
    Boundary,
    Backref,

    // Group openers
    NonCaptGroup,
    AtomicGroup,
    PosLookahead,
    NegLookahead,
    PosLookbehind,
    NegLookbehind,
    SetOptions,
    PythonNamedGroup,
    RubyNamedGroup,
    RubyQuotedNamedGroup,
    PythonNamedGroupRef,
    RubyNamedGroupRef,
    RubyQuotedNamedGroupRef,
    RubyNamedGroupCall,
    RubyQuotedNamedGroupCall,
    BraceNamedGroupRef,
    PcreRecursiveNamedGroupRef,
    PcreNumberedGroupRef,
    PythonCondRef,

    // Options, quoting and comments
    OptionsOn,
    OptionsOff,
    QuoteBegin,
    QuoteEnd,
    Comment,
    Whitespace,
}

impl TokenKind {
    /// The stable upper-case identifier of this kind.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Character => "CHARACTER",
            EscCharacter => "ESC_CHARACTER",
            EscCtrlCharacter => "ESC_CTRL_CHARACTER",
            CtrlCharacter => "CTRL_CHARACTER",
            UnicodeChar => "UNICODE_CHAR",
            HexChar => "HEX_CHAR",
            OctChar => "OCT_CHAR",
            RedundantEscape => "REDUNDANT_ESCAPE",
            BadHexValue => "BAD_HEX_VALUE",
            BadOctValue => "BAD_OCT_VALUE",
            BadCharacter => "BAD_CHARACTER",
            Minus => "MINUS",
            GroupBegin => "GROUP_BEGIN",
            GroupEnd => "GROUP_END",
            ClassBegin => "CLASS_BEGIN",
            ClassEnd => "CLASS_END",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            BracketExpressionBegin => "BRACKET_EXPRESSION_BEGIN",
            BracketExpressionEnd => "BRACKET_EXPRESSION_END",
            MysqlCharBegin => "MYSQL_CHAR_BEGIN",
            MysqlCharEnd => "MYSQL_CHAR_END",
            MysqlCharEqBegin => "MYSQL_CHAR_EQ_BEGIN",
            MysqlCharEqEnd => "MYSQL_CHAR_EQ_END",
            Union => "UNION",
            Caret => "CARET",
            Dollar => "DOLLAR",
            Dot => "DOT",
            AndAnd => "ANDAND",
            Star => "STAR",
            Plus => "PLUS",
            Quest => "QUEST",
            Colon => "COLON",
            Gt => "GT",
            Lt => "LT",
            Eq => "EQ",
            Quote => "QUOTE",
            Comma => "COMMA",
            Number => "NUMBER",
            Name => "NAME",
            CharClass => "CHAR_CLASS",
            Property => "PROPERTY",
            CategoryShortHand => "CATEGORY_SHORT_HAND",
            NamedCharacter => "NAMED_CHARACTER",
            Boundary => "BOUNDARY",
            Backref => "BACKREF",
            NonCaptGroup => "NON_CAPT_GROUP",
            AtomicGroup => "ATOMIC_GROUP",
            PosLookahead => "POS_LOOKAHEAD",
            NegLookahead => "NEG_LOOKAHEAD",
            PosLookbehind => "POS_LOOKBEHIND",
            NegLookbehind => "NEG_LOOKBEHIND",
            SetOptions => "SET_OPTIONS",
            PythonNamedGroup => "PYTHON_NAMED_GROUP",
            RubyNamedGroup => "RUBY_NAMED_GROUP",
            RubyQuotedNamedGroup => "RUBY_QUOTED_NAMED_GROUP",
            PythonNamedGroupRef => "PYTHON_NAMED_GROUP_REF",
            RubyNamedGroupRef => "RUBY_NAMED_GROUP_REF",
            RubyQuotedNamedGroupRef => "RUBY_QUOTED_NAMED_GROUP_REF",
            RubyNamedGroupCall => "RUBY_NAMED_GROUP_CALL",
            RubyQuotedNamedGroupCall => "RUBY_QUOTED_NAMED_GROUP_CALL",
            BraceNamedGroupRef => "BRACE_NAMED_GROUP_REF",
            PcreRecursiveNamedGroupRef => "PCRE_RECURSIVE_NAMED_GROUP_REF",
            PcreNumberedGroupRef => "PCRE_NUMBERED_GROUP_REF",
            PythonCondRef => "PYTHON_COND_REF",
            OptionsOn => "OPTIONS_ON",
            OptionsOff => "OPTIONS_OFF",
            QuoteBegin => "QUOTE_BEGIN",
            QuoteEnd => "QUOTE_END",
            Comment => "COMMENT",
            Whitespace => "WHITESPACE",
        }
    }

    /// Tokens the grammar never sees. They still end up as tree leaves.
    pub fn is_trivia(self) -> bool {
        TRIVIA.contains(self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A small bitset of token kinds, usable in `const` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn new(kinds: &[TokenKind]) -> TokenSet {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1u128 << kinds[i] as u8;
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    pub const fn contains(&self, kind: TokenKind) -> bool {
        self.0 & (1u128 << kind as u8) != 0
    }
}

/// Every kind that stands for a single literal character.
pub const CHARACTERS: TokenSet = TokenSet::new(&[
    TokenKind::Character,
    TokenKind::EscCharacter,
    TokenKind::EscCtrlCharacter,
    TokenKind::CtrlCharacter,
    TokenKind::UnicodeChar,
    TokenKind::HexChar,
    TokenKind::OctChar,
    TokenKind::RedundantEscape,
    TokenKind::BadHexValue,
    TokenKind::BadOctValue,
    TokenKind::BadCharacter,
    TokenKind::Minus,
]);

pub const QUANTIFIERS: TokenSet =
    TokenSet::new(&[TokenKind::Star, TokenKind::Plus, TokenKind::Quest]);

/// Openers followed by a pattern and a closing `)`, without a name.
pub const GROUP_OPENERS: TokenSet = TokenSet::new(&[
    TokenKind::GroupBegin,
    TokenKind::NonCaptGroup,
    TokenKind::AtomicGroup,
    TokenKind::PosLookahead,
    TokenKind::NegLookahead,
    TokenKind::PosLookbehind,
    TokenKind::NegLookbehind,
]);

pub const NAMED_GROUP_OPENERS: TokenSet = TokenSet::new(&[
    TokenKind::PythonNamedGroup,
    TokenKind::RubyNamedGroup,
    TokenKind::RubyQuotedNamedGroup,
]);

pub const NAMED_GROUP_REFS: TokenSet = TokenSet::new(&[
    TokenKind::PythonNamedGroupRef,
    TokenKind::RubyNamedGroupRef,
    TokenKind::RubyQuotedNamedGroupRef,
    TokenKind::RubyNamedGroupCall,
    TokenKind::RubyQuotedNamedGroupCall,
    TokenKind::BraceNamedGroupRef,
    TokenKind::PcreRecursiveNamedGroupRef,
]);

pub const BOUNDARIES: TokenSet =
    TokenSet::new(&[TokenKind::Caret, TokenKind::Dollar, TokenKind::Boundary]);

pub const SIMPLE_CLASSES: TokenSet = TokenSet::new(&[TokenKind::Dot, TokenKind::CharClass]);

pub const TRIVIA: TokenSet = TokenSet::new(&[
    TokenKind::QuoteBegin,
    TokenKind::QuoteEnd,
    TokenKind::Comment,
    TokenKind::Whitespace,
]);

/// A token: a kind and the byte range it covers in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K = TokenKind> {
    pub kind: K,
    pub span: Range<usize>,
}

impl<K> Token<K> {
    pub fn new(kind: K, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_contain_their_members_only() {
        assert!(CHARACTERS.contains(TokenKind::Minus));
        assert!(CHARACTERS.contains(TokenKind::BadOctValue));
        assert!(!CHARACTERS.contains(TokenKind::Dot));
        assert!(QUANTIFIERS.contains(TokenKind::Quest));
        assert!(!QUANTIFIERS.contains(TokenKind::LBrace));
        assert!(SIMPLE_CLASSES.contains(TokenKind::Dot));
        assert!(TokenSet::EMPTY.union(BOUNDARIES).contains(TokenKind::Caret));
    }

    #[test]
    fn trivia_kinds() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::QuoteEnd.is_trivia());
        assert!(!TokenKind::Character.is_trivia());
    }

    #[test]
    fn last_kind_fits_in_set() {
        assert!((TokenKind::Whitespace as u8) < 128);
        assert!(TokenSet::new(&[TokenKind::Whitespace]).contains(TokenKind::Whitespace));
    }

    #[test]
    fn names_are_screaming_snake_case() {
        assert_eq!(TokenKind::PythonCondRef.name(), "PYTHON_COND_REF");
        assert_eq!(TokenKind::AndAnd.to_string(), "ANDAND");
    }
}
