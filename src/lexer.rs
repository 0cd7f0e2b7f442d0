//! Capability-aware pattern lexer.
//!
//! The lexer is a small state machine over a stack of lexical states. Each
//! state has its own logos scanner (see [`lexemes`]) that finds the extent
//! of the next lexeme; the adapter here decides what that lexeme means given
//! the active [`CapabilitySet`] and the surrounding context, sometimes
//! shortening it.
//!
//! The token stream always covers the input exactly: every byte belongs to
//! exactly one token and tokens come out in order.

mod escape;
mod lexemes;

use crate::capability::{Capability, CapabilitySet};
use crate::token::{Token, TokenKind};

use lexemes::{
    BracketLexeme, ClassLexeme, NameLexeme, NamedCharLexeme, OptionsLexeme, PatternLexeme,
    PropertyLexeme, QuantifierLexeme, scan,
};

/// Position of the lexer inside the current character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassPos {
    Start,
    AfterCaret,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Class(ClassPos),
    Quote,
    Quantifier,
    Options,
    GroupName,
    CondRef,
    Property,
    PropertyName,
    NamedChar,
    PosixBracket,
    MysqlChar,
    MysqlCharEq,
}

/// Streaming lexer over a pattern.
///
/// A fresh lexer must be used for every input. Iterating yields [`Token`]s;
/// [`Lexer::capturing_group_count`] reports the capturing groups seen so far.
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    capabilities: CapabilitySet,
    states: Vec<State>,
    saved_comment_modes: Vec<bool>,
    comments: bool,
    capturing_groups: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, capabilities: CapabilitySet) -> Self {
        Self {
            text,
            pos: 0,
            capabilities,
            states: Vec::new(),
            saved_comment_modes: Vec::new(),
            comments: capabilities.contains(Capability::CommentMode),
            capturing_groups: 0,
        }
    }

    /// Number of capturing group openers produced so far.
    pub fn capturing_group_count(&self) -> usize {
        self.capturing_groups
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn first_char_len(&self) -> usize {
        self.rest().chars().next().map_or(1, char::len_utf8)
    }

    fn line_comment_len(&self) -> usize {
        let rest = self.rest();
        rest.find('\n').unwrap_or(rest.len())
    }

    fn set_class_pos(&mut self, pos: ClassPos) {
        if let Some(State::Class(current)) = self.states.last_mut() {
            *current = pos;
        }
    }

    /// Record the comment mode to restore when the group closes.
    fn open_group(&mut self) {
        self.saved_comment_modes.push(self.comments);
    }

    fn close_group(&mut self) {
        if let Some(saved) = self.saved_comment_modes.pop() {
            self.comments = saved;
        }
    }

    fn group_opener(&mut self, kind: TokenKind, len: usize) -> (TokenKind, usize) {
        self.open_group();
        (kind, len)
    }

    fn named_group_opener(&mut self, kind: TokenKind, len: usize) -> (TokenKind, usize) {
        self.capturing_groups += 1;
        self.open_group();
        self.states.push(State::GroupName);
        (kind, len)
    }

    fn options_opener(&mut self, len: usize) -> (TokenKind, usize) {
        self.open_group();
        self.states.push(State::Options);
        (TokenKind::SetOptions, len)
    }

    /// Kind and byte length of the next token. Sub-states that do not
    /// recognise the input return `None` and are popped, so the state
    /// underneath rescans the same position.
    fn next_token(&mut self) -> Option<(TokenKind, usize)> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let token = match self.states.last().copied() {
                None => Some(self.lex_normal()),
                Some(State::Class(pos)) => Some(self.lex_class(pos)),
                Some(State::Quote) => Some(self.lex_quote()),
                Some(State::Quantifier) => self.lex_quantifier(),
                Some(State::Options) => self.lex_options(),
                Some(State::GroupName) => self.lex_group_name(),
                Some(State::CondRef) => self.lex_cond_ref(),
                Some(State::Property) => self.lex_property(),
                Some(State::PropertyName) => self.lex_property_name(),
                Some(State::NamedChar) => self.lex_named_char(),
                Some(State::PosixBracket) => self.lex_posix_bracket(),
                Some(State::MysqlChar) => self.lex_mysql(false),
                Some(State::MysqlCharEq) => self.lex_mysql(true),
            };
            match token {
                Some(token) => return Some(token),
                None => {
                    self.states.pop();
                }
            }
        }
    }

    fn lex_normal(&mut self) -> (TokenKind, usize) {
        use TokenKind::*;
        let (lexeme, len) = match scan::<PatternLexeme>(self.rest()) {
            Some((Some(lexeme), len)) => (lexeme, len),
            _ => return (Character, self.first_char_len()),
        };
        match lexeme {
            PatternLexeme::Backslash => self.lex_escape(false),
            PatternLexeme::GroupOpen => {
                self.capturing_groups += 1;
                self.group_opener(GroupBegin, len)
            }
            PatternLexeme::NonCapturing => self.group_opener(NonCaptGroup, len),
            PatternLexeme::Atomic => self.group_opener(AtomicGroup, len),
            PatternLexeme::PosLookahead => self.group_opener(PosLookahead, len),
            PatternLexeme::NegLookahead => self.group_opener(NegLookahead, len),
            PatternLexeme::PosLookbehind => self.group_opener(PosLookbehind, len),
            PatternLexeme::NegLookbehind => self.group_opener(NegLookbehind, len),
            PatternLexeme::AngleNamed => self.named_group_opener(RubyNamedGroup, len),
            PatternLexeme::QuotedNamed => self.named_group_opener(RubyQuotedNamedGroup, len),
            PatternLexeme::PythonNamed => self.named_group_opener(PythonNamedGroup, len),
            PatternLexeme::PythonNamedRef => {
                self.states.push(State::GroupName);
                self.group_opener(PythonNamedGroupRef, len)
            }
            PatternLexeme::RecursiveNamedRef => {
                self.states.push(State::GroupName);
                self.group_opener(PcreRecursiveNamedGroupRef, len)
            }
            PatternLexeme::Conditional => {
                self.states.push(State::CondRef);
                self.group_opener(PythonCondRef, len)
            }
            PatternLexeme::InlineComment => {
                let rest = self.rest();
                (Comment, rest.find(')').map_or(rest.len(), |i| i + 1))
            }
            PatternLexeme::Recurse => {
                if self.rest()[len..].starts_with(')') {
                    self.group_opener(PcreNumberedGroupRef, len)
                } else {
                    // `(?R` not followed by `)` is an options group
                    self.options_opener(2)
                }
            }
            PatternLexeme::NumberedRef => self.group_opener(PcreNumberedGroupRef, len),
            PatternLexeme::Options => self.options_opener(len),
            PatternLexeme::GroupClose => {
                self.close_group();
                (GroupEnd, len)
            }
            PatternLexeme::ClassOpen => {
                self.states.push(State::Class(ClassPos::Start));
                (ClassBegin, len)
            }
            PatternLexeme::ClassClose => {
                if self.has(Capability::NoDanglingMetacharacters) {
                    (ClassEnd, len)
                } else {
                    (Character, len)
                }
            }
            PatternLexeme::BraceOpen => {
                if self.has(Capability::DanglingMetacharacters) && !self.quantifier_follows() {
                    (Character, len)
                } else {
                    self.states.push(State::Quantifier);
                    (LBrace, len)
                }
            }
            PatternLexeme::BraceClose => {
                if self.has(Capability::NoDanglingMetacharacters) {
                    (RBrace, len)
                } else {
                    (Character, len)
                }
            }
            PatternLexeme::Bar => (Union, len),
            PatternLexeme::Star => (Star, len),
            PatternLexeme::Plus => (Plus, len),
            PatternLexeme::Quest => (Quest, len),
            PatternLexeme::Dot => (Dot, len),
            PatternLexeme::Caret | PatternLexeme::Dollar if self.has(Capability::XmlSchemaMode) => {
                (Character, len)
            }
            PatternLexeme::Caret => (Caret, len),
            PatternLexeme::Dollar => (Dollar, len),
            PatternLexeme::Hash if self.comments => (Comment, self.line_comment_len()),
            PatternLexeme::Whitespace if self.comments => (Whitespace, len),
            PatternLexeme::Hash | PatternLexeme::Whitespace => (Character, self.first_char_len()),
            PatternLexeme::Literal => (Character, len),
        }
    }

    /// Whether the `{` at the current position starts a counted quantifier.
    fn quantifier_follows(&self) -> bool {
        let body = &self.rest()[1..];
        let Some(end) = body.find('}') else {
            return false;
        };
        let body = &body[..end];
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        match body.split_once(',') {
            None => digits(body),
            Some((min, max)) => match (min.is_empty(), max.is_empty()) {
                (false, _) => digits(min) && (max.is_empty() || digits(max)),
                (true, false) => digits(max) && self.capabilities.omits_quantifier_minimum(),
                (true, true) => self.has(Capability::OmitBothNumbersInQuantifiers),
            },
        }
    }

    fn lex_class(&mut self, pos: ClassPos) -> (TokenKind, usize) {
        use TokenKind::*;
        let at_start = pos != ClassPos::Inside;
        self.set_class_pos(ClassPos::Inside);
        let (lexeme, len) = match scan::<ClassLexeme>(self.rest()) {
            Some((Some(lexeme), len)) => (lexeme, len),
            _ => return (Character, self.first_char_len()),
        };
        let class_trivia = self.comments && self.has(Capability::WhitespaceInClass);
        match lexeme {
            ClassLexeme::Backslash => self.lex_escape(true),
            ClassLexeme::PosixOpen if self.has(Capability::PosixBracketExpressions) => {
                self.states.push(State::PosixBracket);
                (BracketExpressionBegin, len)
            }
            ClassLexeme::CollatingOpen if self.has(Capability::MysqlBracketExpressions) => {
                self.states.push(State::MysqlChar);
                (MysqlCharBegin, len)
            }
            ClassLexeme::EquivalenceOpen if self.has(Capability::MysqlBracketExpressions) => {
                self.states.push(State::MysqlCharEq);
                (MysqlCharEqBegin, len)
            }
            ClassLexeme::Open
            | ClassLexeme::PosixOpen
            | ClassLexeme::CollatingOpen
            | ClassLexeme::EquivalenceOpen => {
                if self.has(Capability::NestedCharacterClasses) {
                    self.states.push(State::Class(ClassPos::Start));
                    (ClassBegin, 1)
                } else {
                    (Character, 1)
                }
            }
            ClassLexeme::Close => {
                if at_start && !self.has(Capability::AllowEmptyCharacterClass) {
                    (Character, len)
                } else {
                    self.states.pop();
                    (ClassEnd, len)
                }
            }
            ClassLexeme::Caret if pos == ClassPos::Start => {
                self.set_class_pos(ClassPos::AfterCaret);
                (Caret, len)
            }
            ClassLexeme::Minus if !at_start => (Minus, len),
            ClassLexeme::AndAnd if self.has(Capability::NestedCharacterClasses) => (AndAnd, len),
            ClassLexeme::AndAnd => (Character, 1),
            ClassLexeme::Hash if class_trivia => {
                self.set_class_pos(pos);
                (Comment, self.line_comment_len())
            }
            ClassLexeme::Whitespace if class_trivia => {
                self.set_class_pos(pos);
                (Whitespace, len)
            }
            ClassLexeme::Whitespace => (Character, self.first_char_len()),
            ClassLexeme::Caret
            | ClassLexeme::Minus
            | ClassLexeme::Amp
            | ClassLexeme::Hash
            | ClassLexeme::Literal => (Character, len),
        }
    }

    fn lex_quote(&mut self) -> (TokenKind, usize) {
        if self.rest().starts_with("\\E") {
            self.states.pop();
            (TokenKind::QuoteEnd, 2)
        } else {
            (TokenKind::Character, self.first_char_len())
        }
    }

    fn lex_quantifier(&mut self) -> Option<(TokenKind, usize)> {
        match scan::<QuantifierLexeme>(self.rest())? {
            (Some(QuantifierLexeme::Number), len) => Some((TokenKind::Number, len)),
            (Some(QuantifierLexeme::Comma), len) => Some((TokenKind::Comma, len)),
            (Some(QuantifierLexeme::Close), len) => {
                self.states.pop();
                Some((TokenKind::RBrace, len))
            }
            (None, _) => None,
        }
    }

    fn lex_options(&mut self) -> Option<(TokenKind, usize)> {
        let rest = self.rest();
        match scan::<OptionsLexeme>(rest)? {
            (Some(OptionsLexeme::On), len) => {
                if rest[..len].contains('x') {
                    self.comments = true;
                }
                Some((TokenKind::OptionsOn, len))
            }
            (Some(OptionsLexeme::Off), len) => {
                if rest[..len].contains('x') {
                    self.comments = false;
                }
                Some((TokenKind::OptionsOff, len))
            }
            (Some(OptionsLexeme::Colon), len) => {
                self.states.pop();
                Some((TokenKind::Colon, len))
            }
            (Some(OptionsLexeme::Close), len) => {
                // `(?x)` applies to the rest of the enclosing group
                self.states.pop();
                self.saved_comment_modes.pop();
                Some((TokenKind::GroupEnd, len))
            }
            (None, _) => None,
        }
    }

    fn lex_group_name(&mut self) -> Option<(TokenKind, usize)> {
        let (lexeme, len) = scan::<NameLexeme>(self.rest())?;
        let kind = match lexeme? {
            NameLexeme::Name => TokenKind::Name,
            NameLexeme::Number => TokenKind::Number,
            NameLexeme::Gt => TokenKind::Gt,
            NameLexeme::Quote => TokenKind::Quote,
            NameLexeme::BraceClose => TokenKind::RBrace,
            NameLexeme::Lt | NameLexeme::ParenClose => return None,
        };
        if !matches!(kind, TokenKind::Name | TokenKind::Number) {
            self.states.pop();
        }
        Some((kind, len))
    }

    fn lex_cond_ref(&mut self) -> Option<(TokenKind, usize)> {
        let (lexeme, len) = scan::<NameLexeme>(self.rest())?;
        let kind = match lexeme? {
            NameLexeme::Name => TokenKind::Name,
            NameLexeme::Number => TokenKind::Number,
            NameLexeme::Gt => TokenKind::Gt,
            NameLexeme::Lt => TokenKind::Lt,
            NameLexeme::Quote => TokenKind::Quote,
            NameLexeme::ParenClose => {
                // closes the condition only, the conditional group stays open
                self.states.pop();
                TokenKind::GroupEnd
            }
            NameLexeme::BraceClose => return None,
        };
        Some((kind, len))
    }

    fn lex_property(&mut self) -> Option<(TokenKind, usize)> {
        let c = self.rest().chars().next()?;
        if c == '{' {
            if let Some(state) = self.states.last_mut() {
                *state = State::PropertyName;
            }
            Some((TokenKind::LBrace, 1))
        } else if c.is_ascii_alphabetic() {
            self.states.pop();
            Some((TokenKind::CategoryShortHand, 1))
        } else {
            None
        }
    }

    fn lex_property_name(&mut self) -> Option<(TokenKind, usize)> {
        let (lexeme, len) = scan::<PropertyLexeme>(self.rest())?;
        let kind = match lexeme? {
            PropertyLexeme::Caret => TokenKind::Caret,
            PropertyLexeme::Eq => TokenKind::Eq,
            PropertyLexeme::Name => TokenKind::Name,
            PropertyLexeme::Close => {
                self.states.pop();
                TokenKind::RBrace
            }
            PropertyLexeme::Open => return None,
        };
        Some((kind, len))
    }

    fn lex_named_char(&mut self) -> Option<(TokenKind, usize)> {
        let (lexeme, len) = scan::<NamedCharLexeme>(self.rest())?;
        let kind = match lexeme? {
            NamedCharLexeme::Open => TokenKind::LBrace,
            NamedCharLexeme::Name => TokenKind::Name,
            NamedCharLexeme::Close => {
                self.states.pop();
                TokenKind::RBrace
            }
        };
        Some((kind, len))
    }

    fn lex_posix_bracket(&mut self) -> Option<(TokenKind, usize)> {
        let (lexeme, len) = scan::<BracketLexeme>(self.rest())?;
        let kind = match lexeme? {
            BracketLexeme::Caret => TokenKind::Caret,
            BracketLexeme::Name => TokenKind::Name,
            BracketLexeme::End => {
                self.states.pop();
                TokenKind::BracketExpressionEnd
            }
        };
        Some((kind, len))
    }

    fn lex_mysql(&mut self, equivalence: bool) -> Option<(TokenKind, usize)> {
        let rest = self.rest();
        let (end, end_kind) = if equivalence {
            ("=]", TokenKind::MysqlCharEqEnd)
        } else {
            (".]", TokenKind::MysqlCharEnd)
        };
        if rest.starts_with(end) {
            self.states.pop();
            return Some((end_kind, end.len()));
        }
        if rest.starts_with(']') {
            return None;
        }
        let word = rest
            .bytes()
            .enumerate()
            .take_while(|&(i, b)| b.is_ascii_alphabetic() || (i > 0 && b == b'-'))
            .count();
        if word > 1 {
            Some((TokenKind::Name, word))
        } else {
            Some((TokenKind::Character, self.first_char_len()))
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let (kind, len) = self.next_token()?;
        let start = self.pos;
        self.pos += len;
        Some(Token::new(kind, start..self.pos))
    }
}

/// Lex the whole of `text` into a token vector.
pub fn tokenize(text: &str, capabilities: CapabilitySet) -> Vec<Token> {
    Lexer::new(text, capabilities).collect()
}
