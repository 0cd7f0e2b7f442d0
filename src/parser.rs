//! Error-tolerant recursive descent parser for regular expressions.
//!
//! Grammar, with capability checks noted where they apply:
//!
//! ```text
//! Pattern    ::= Branch ( '|' Branch )*
//! Branch     ::= Atom*
//! Atom       ::= Group Quantifier?
//! Quantifier ::= ( '{' Bounds '}' | '*' | '+' | '?' ) ( '+' | '?' )?
//! Group      ::= GroupOpener Pattern ')'
//!              | '(?' Options ( ':' Pattern )? ')'
//!              | NamedGroupOpener Name Closer Pattern ')'
//!              | NamedGroupRef ( Name | Number ) Closer
//!              | '(?(' Condition ')' Branch ( '|' Branch )? ')'
//!              | Char | Class | Boundary | Backref | Property | SimpleClass
//! Class      ::= '[' '^'? ClassDef ( '&&' ClassDef )* ']'
//! ClassDef   ::= ( Class | PosixBracket | MysqlChar | CharRange | SimpleClass | Property )*
//! CharRange  ::= Char ( '-' Char )?
//! ```
//!
//! Parsing never fails. Missing pieces produce a [`Diagnostic`] and the node
//! that was being built is committed anyway.

#[cfg(test)]
mod tests;

use crate::builder::{CompletedMarker, Marker, TreeBuilder};
use crate::capability::{Capability, CapabilitySet};
use crate::diagnostic::Diagnostic;
use crate::lexer::Lexer;
use crate::syntax::{NodeKind, RegExp, SyntaxTree};
use crate::token::{
    BOUNDARIES, CHARACTERS, GROUP_OPENERS, NAMED_GROUP_OPENERS, NAMED_GROUP_REFS, QUANTIFIERS,
    SIMPLE_CLASSES, TokenKind,
};

/// Groups and classes nested deeper than this are not descended into.
pub const MAX_NESTING_DEPTH: usize = 128;

/// The result of parsing one pattern.
#[derive(Debug)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
    capturing_groups: usize,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Diagnostics in order of position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn capturing_group_count(&self) -> usize {
        self.capturing_groups
    }

    pub fn has_capturing_groups(&self) -> bool {
        self.capturing_groups > 0
    }

    pub fn into_parts(self) -> (SyntaxTree, Vec<Diagnostic>) {
        (self.tree, self.diagnostics)
    }
}

/// Parse `text` with the given capabilities.
pub fn parse(text: &str, capabilities: CapabilitySet) -> Parse {
    let mut parser = Parser {
        b: TreeBuilder::new(text, Lexer::new(text, capabilities)),
        capabilities,
        depth: 0,
    };
    parser.parse_file();
    let capturing_groups = parser.b.source().capturing_group_count();
    let (tree, diagnostics) = parser.b.finish(NodeKind::File);
    Parse {
        tree,
        diagnostics,
        capturing_groups,
    }
}

struct Parser<'a> {
    b: TreeBuilder<'a, RegExp, Lexer<'a>>,
    capabilities: CapabilitySet,
    depth: usize,
}

impl Parser<'_> {
    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    fn at_any(&self, set: crate::token::TokenSet) -> bool {
        self.b.current().is_some_and(|k| set.contains(k))
    }

    /// Report a construct the active dialect does not support.
    fn not_allowed(&mut self, what: &str) {
        self.b.error(format!("{what} not allowed in this regular expression dialect"));
    }

    /// Step one level deeper, or report and refuse when nesting is too deep.
    fn enter(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            self.b.error("Pattern nested too deeply");
            false
        } else {
            self.depth += 1;
            true
        }
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_file(&mut self) {
        self.parse_pattern();
        while !self.b.at_end() {
            self.pattern_expected();
            self.b.advance();
        }
    }

    fn pattern_expected(&mut self) {
        match self.b.current() {
            Some(TokenKind::GroupEnd) => self.b.error("Unmatched closing ')'"),
            Some(TokenKind::LBrace | TokenKind::RBrace | TokenKind::ClassEnd) => {
                self.b.error("Dangling metacharacter")
            }
            Some(kind) if QUANTIFIERS.contains(kind) => self.b.error("Dangling metacharacter"),
            _ => self.b.error("Pattern expected"),
        }
    }

    fn parse_pattern(&mut self) {
        let m = self.b.mark();
        self.parse_branch();
        while self.b.eat(TokenKind::Union) {
            self.parse_branch();
        }
        self.b.done(m, NodeKind::Pattern);
    }

    fn parse_branch(&mut self) {
        let m = self.b.mark();
        if !self.parse_atom() {
            // empty branches are fine where a branch may end
            match self.b.current() {
                None | Some(TokenKind::GroupEnd | TokenKind::Union) => {
                    self.b.done(m, NodeKind::Branch);
                }
                Some(_) => self.b.drop(m),
            }
            return;
        }
        while self.parse_atom() {}
        self.b.done(m, NodeKind::Branch);
    }

    fn parse_atom(&mut self) -> bool {
        let Some(group) = self.parse_group() else {
            return false;
        };
        if self.at_any(QUANTIFIERS) || self.b.at(TokenKind::LBrace) {
            let closure = self.b.precede(group);
            self.parse_quantifier();
            self.b.done(closure, NodeKind::Closure);
        }
        true
    }

    fn parse_quantifier(&mut self) {
        let m = self.b.mark();
        if self.b.eat(TokenKind::LBrace) {
            self.parse_bounds();
        } else {
            self.b.advance();
        }
        // reluctant or possessive
        if self.b.at(TokenKind::Quest) || self.b.at(TokenKind::Plus) {
            self.b.advance();
        }
        self.b.done(m, NodeKind::Quantifier);
    }

    /// The inside of `{...}`, after the opening brace.
    fn parse_bounds(&mut self) {
        let min_omitted = self.b.at(TokenKind::Comma);
        if min_omitted {
            if !self.capabilities.omits_quantifier_minimum() {
                self.b.error("Number expected");
            }
        } else if !self.parse_number() {
            self.b.error("Number expected");
            if !self.b.at(TokenKind::RBrace) && !self.b.at(TokenKind::Comma) {
                return;
            }
        }
        if self.b.eat(TokenKind::RBrace) {
            return;
        }
        if !self.b.eat(TokenKind::Comma) {
            self.b.error("',' or '}' expected");
            return;
        }
        let max_present = self.parse_number();
        if !max_present
            && min_omitted
            && self.capabilities.omits_quantifier_minimum()
            && !self.has(Capability::OmitBothNumbersInQuantifiers)
        {
            self.b.error("Number expected");
        }
        self.b.expect(TokenKind::RBrace, "'}' expected");
    }

    fn parse_number(&mut self) -> bool {
        if !self.b.at(TokenKind::Number) {
            return false;
        }
        if self.b.current_text().parse::<u32>().is_err() {
            self.b.error("Repetition value too large");
        }
        let m = self.b.mark();
        self.b.advance();
        self.b.done(m, NodeKind::Number);
        true
    }

    /// Anything that can carry a quantifier.
    fn parse_group(&mut self) -> Option<CompletedMarker> {
        use TokenKind::*;
        let kind = self.b.current()?;
        let m = self.b.mark();
        let completed = match kind {
            k if GROUP_OPENERS.contains(k) => {
                self.b.advance();
                self.parse_group_body(m)
            }
            SetOptions => self.parse_options(m),
            k if NAMED_GROUP_OPENERS.contains(k) => {
                self.b.advance();
                self.b.expect(Name, "Group name expected");
                let closer = if k == RubyQuotedNamedGroup { Quote } else { Gt };
                self.b.expect(closer, "Unclosed group name");
                self.parse_group_body(m)
            }
            k if NAMED_GROUP_REFS.contains(k) => self.parse_named_group_ref(m, k),
            PcreNumberedGroupRef => {
                if !self.has(Capability::PcreNumberedGroupRef) {
                    self.not_allowed("Numbered group reference");
                }
                self.b.advance();
                self.b.expect(GroupEnd, "Unclosed group reference");
                self.b.done(m, NodeKind::Backref)
            }
            PythonCondRef => self.parse_conditional(m),
            Property => self.parse_property(m),
            NamedCharacter => self.parse_named_character(m),
            k if SIMPLE_CLASSES.contains(k) => {
                self.b.advance();
                self.b.done(m, NodeKind::SimpleClass)
            }
            ClassBegin => self.parse_class(m),
            Backref => {
                if self.b.current_text().starts_with("\\g")
                    && !self.has(Capability::PcreBackReferences)
                {
                    self.not_allowed("This back reference syntax is");
                }
                self.b.advance();
                self.b.done(m, NodeKind::Backref)
            }
            k if BOUNDARIES.contains(k) => {
                self.b.advance();
                self.b.done(m, NodeKind::Boundary)
            }
            k if CHARACTERS.contains(k) => self.parse_char(m),
            _ => {
                self.b.drop(m);
                return None;
            }
        };
        Some(completed)
    }

    /// Pattern and closing `)` of a group whose opener was consumed.
    fn parse_group_body(&mut self, m: Marker) -> CompletedMarker {
        if self.enter() {
            self.parse_pattern();
            self.leave();
            self.b.expect(TokenKind::GroupEnd, "Unclosed group");
        }
        self.b.done(m, NodeKind::Group)
    }

    /// `(?flags)` or `(?flags:pattern)`.
    fn parse_options(&mut self, m: Marker) -> CompletedMarker {
        self.b.advance();
        if self.b.at(TokenKind::OptionsOn) || self.b.at(TokenKind::OptionsOff) {
            let options = self.b.mark();
            while self.b.at(TokenKind::OptionsOn) || self.b.at(TokenKind::OptionsOff) {
                self.b.advance();
            }
            self.b.done(options, NodeKind::Options);
        }
        if self.b.eat(TokenKind::Colon) {
            return self.parse_group_body(m);
        }
        self.b.expect(TokenKind::GroupEnd, "Unclosed options group");
        self.b.done(m, NodeKind::SetOptions)
    }

    fn parse_named_group_ref(&mut self, m: Marker, opener: TokenKind) -> CompletedMarker {
        use TokenKind::*;
        if opener == BraceNamedGroupRef && !self.has(Capability::PcreBackReferences) {
            self.not_allowed("This named group reference syntax is");
        }
        self.b.advance();
        if !self.b.eat(Name) && !self.b.eat(Number) {
            self.b.error("Group name expected");
        }
        let closer = match opener {
            RubyNamedGroupRef | RubyNamedGroupCall => Gt,
            RubyQuotedNamedGroupRef | RubyQuotedNamedGroupCall => Quote,
            BraceNamedGroupRef => RBrace,
            _ => GroupEnd,
        };
        self.b.expect(closer, "Unclosed group reference");
        self.b.done(m, NodeKind::NamedGroupRef)
    }

    /// `(?(cond)yes|no)`.
    fn parse_conditional(&mut self, m: Marker) -> CompletedMarker {
        use TokenKind::*;
        self.b.advance();
        match self.b.current() {
            Some(Number | Name) => self.b.advance(),
            Some(open @ (Lt | Quote)) => {
                if !self.has(Capability::PcreConditions) {
                    self.not_allowed("This condition syntax is");
                }
                self.b.advance();
                self.b.expect(Name, "Group name expected");
                let closer = if open == Lt { Gt } else { Quote };
                self.b.expect(closer, "Unclosed group reference");
            }
            _ => self.b.error("Group name or number expected"),
        }
        self.b.expect(GroupEnd, "Unclosed group reference");
        if self.enter() {
            self.parse_branch();
            if self.b.eat(Union) {
                self.parse_branch();
            }
            self.leave();
            self.b.expect(GroupEnd, "Unclosed group");
        }
        self.b.done(m, NodeKind::PyCondRef)
    }

    /// `\pL`, `\p{Name}`, `\P{^Name}`, `\p{Name=Value}`.
    fn parse_property(&mut self, m: Marker) -> CompletedMarker {
        use TokenKind::*;
        self.b.advance();
        if self.b.at(CategoryShortHand) {
            if !self.has(Capability::UnicodeCategoryShorthand) {
                self.not_allowed("Category shorthand");
            }
            self.b.advance();
        } else if self.b.expect(LBrace, "Character category expected") {
            if self.b.at(Caret) {
                if !self.has(Capability::CaretNegatedProperties) {
                    self.not_allowed("Negating a property with '^' is");
                }
                self.b.advance();
            }
            if self.b.expect(Name, "Property name expected") && self.b.at(Eq) {
                if !self.has(Capability::PropertyValues) {
                    self.not_allowed("Property value");
                }
                self.b.advance();
                self.b.expect(Name, "Property value expected");
            }
            self.b.expect(RBrace, "Unclosed character category");
        }
        self.b.done(m, NodeKind::Property)
    }

    /// `\N{NAME}`.
    fn parse_named_character(&mut self, m: Marker) -> CompletedMarker {
        self.b.advance();
        if self.b.expect(TokenKind::LBrace, "'{' expected") {
            self.b.expect(TokenKind::Name, "Character name expected");
            self.b.expect(TokenKind::RBrace, "Unclosed character name");
        }
        self.b.done(m, NodeKind::NamedCharacter)
    }

    fn parse_char(&mut self, m: Marker) -> CompletedMarker {
        match self.b.current() {
            Some(TokenKind::BadHexValue) => self.b.error("Illegal hexadecimal escape sequence"),
            Some(TokenKind::BadOctValue) => self.b.error("Illegal octal escape sequence"),
            Some(TokenKind::BadCharacter) => self.b.error("Illegal/unsupported escape sequence"),
            _ => {}
        }
        self.b.advance();
        self.b.done(m, NodeKind::Char)
    }

    fn parse_class(&mut self, m: Marker) -> CompletedMarker {
        self.b.advance();
        if self.enter() {
            self.b.eat(TokenKind::Caret);
            self.parse_class_intersection();
            self.leave();
            self.b.expect(TokenKind::ClassEnd, "Unclosed character class");
        }
        self.b.done(m, NodeKind::Class)
    }

    fn parse_class_intersection(&mut self) {
        let m = self.b.mark();
        self.parse_class_def();
        if self.b.at(TokenKind::AndAnd) {
            while self.b.eat(TokenKind::AndAnd) {
                self.parse_class_def();
            }
            self.b.done(m, NodeKind::Intersection);
        } else {
            self.b.drop(m);
        }
    }

    fn parse_class_def(&mut self) {
        use TokenKind::*;
        while let Some(kind) = self.b.current() {
            match kind {
                ClassBegin => {
                    let m = self.b.mark();
                    self.parse_class(m);
                }
                BracketExpressionBegin => self.parse_posix_bracket(),
                MysqlCharBegin => {
                    self.parse_mysql_char(MysqlCharEnd, NodeKind::MysqlCharExpression);
                }
                MysqlCharEqBegin => {
                    self.parse_mysql_char(MysqlCharEqEnd, NodeKind::MysqlCharEqExpression);
                }
                NamedCharacter => self.parse_class_range(),
                k if CHARACTERS.contains(k) => self.parse_class_range(),
                k if SIMPLE_CLASSES.contains(k) => {
                    let m = self.b.mark();
                    self.b.advance();
                    self.b.done(m, NodeKind::SimpleClass);
                }
                Property => {
                    let m = self.b.mark();
                    self.parse_property(m);
                }
                _ => return,
            }
        }
    }

    fn parse_class_char(&mut self) {
        let m = self.b.mark();
        if self.b.at(TokenKind::NamedCharacter) {
            self.parse_named_character(m);
        } else {
            self.parse_char(m);
        }
    }

    /// A character, possibly the start of a range. A `-` right before `]`
    /// or a nested class is a literal.
    fn parse_class_range(&mut self) {
        let m = self.b.mark();
        self.parse_class_char();
        if !self.b.at(TokenKind::Minus) {
            self.b.drop(m);
            return;
        }
        match self.b.nth(1) {
            None | Some(TokenKind::ClassEnd | TokenKind::ClassBegin) => {
                self.b.drop(m);
                let minus = self.b.mark();
                self.b.advance();
                self.b.done(minus, NodeKind::Char);
            }
            Some(end) if CHARACTERS.contains(end) || end == TokenKind::NamedCharacter => {
                self.b.advance();
                self.parse_class_char();
                self.b.done(m, NodeKind::CharRange);
            }
            Some(_) => {
                self.b.advance();
                self.b.error("Illegal character range");
                self.b.done(m, NodeKind::CharRange);
            }
        }
    }

    /// `[:alpha:]`, `[:^alpha:]`.
    fn parse_posix_bracket(&mut self) {
        let m = self.b.mark();
        self.b.advance();
        self.b.eat(TokenKind::Caret);
        self.b.expect(TokenKind::Name, "POSIX character class name expected");
        self.b.expect(TokenKind::BracketExpressionEnd, "Unclosed POSIX bracket expression");
        self.b.done(m, NodeKind::PosixBracketExpression);
    }

    /// `[.name.]` or `[=c=]`.
    fn parse_mysql_char(&mut self, end: TokenKind, kind: NodeKind) {
        let m = self.b.mark();
        self.b.advance();
        if !self.b.eat(TokenKind::Name) {
            if self.at_any(CHARACTERS) {
                let c = self.b.mark();
                self.parse_char(c);
            } else {
                self.b.error("Character or name expected");
            }
        }
        self.b.expect(end, "Unclosed MySQL character expression");
        self.b.done(m, kind);
    }
}
