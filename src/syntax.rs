//! Node kinds of the regular expression CST.

use std::fmt;

use crate::token::TokenKind;
use crate::tree::{self, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root wrapper around the whole input.
    File,
    Pattern,
    Branch,
    /// An atom followed by a quantifier.
    Closure,
    Quantifier,
    Number,
    SimpleClass,
    Class,
    CharRange,
    Intersection,
    Char,
    Group,
    Property,
    NamedCharacter,
    Options,
    SetOptions,
    Backref,
    Boundary,
    NamedGroupRef,
    PyCondRef,
    PosixBracketExpression,
    MysqlCharExpression,
    MysqlCharEqExpression,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::File => "FILE",
            NodeKind::Pattern => "PATTERN",
            NodeKind::Branch => "BRANCH",
            NodeKind::Closure => "CLOSURE",
            NodeKind::Quantifier => "QUANTIFIER",
            NodeKind::Number => "NUMBER",
            NodeKind::SimpleClass => "SIMPLE_CLASS",
            NodeKind::Class => "CLASS",
            NodeKind::CharRange => "CHAR_RANGE",
            NodeKind::Intersection => "INTERSECTION",
            NodeKind::Char => "CHAR",
            NodeKind::Group => "GROUP",
            NodeKind::Property => "PROPERTY",
            NodeKind::NamedCharacter => "NAMED_CHARACTER",
            NodeKind::Options => "OPTIONS",
            NodeKind::SetOptions => "SET_OPTIONS",
            NodeKind::Backref => "BACKREF",
            NodeKind::Boundary => "BOUNDARY",
            NodeKind::NamedGroupRef => "NAMED_GROUP_REF",
            NodeKind::PyCondRef => "PY_COND_REF",
            NodeKind::PosixBracketExpression => "POSIX_BRACKET_EXPRESSION",
            NodeKind::MysqlCharExpression => "MYSQL_CHAR_EXPRESSION",
            NodeKind::MysqlCharEqExpression => "MYSQL_CHAR_EQ_EXPRESSION",
        }
    }

    /// Kinds a [`NodeKind::Branch`] is made of.
    pub fn is_atom(self) -> bool {
        matches!(
            self,
            NodeKind::Closure
                | NodeKind::SimpleClass
                | NodeKind::Class
                | NodeKind::Char
                | NodeKind::Group
                | NodeKind::Property
                | NodeKind::NamedCharacter
                | NodeKind::SetOptions
                | NodeKind::Backref
                | NodeKind::Boundary
                | NodeKind::NamedGroupRef
                | NodeKind::PyCondRef
        )
    }

    /// Kinds that may appear directly inside a [`NodeKind::Class`].
    pub fn is_class_element(self) -> bool {
        matches!(
            self,
            NodeKind::Char
                | NodeKind::CharRange
                | NodeKind::Class
                | NodeKind::Intersection
                | NodeKind::SimpleClass
                | NodeKind::Property
                | NodeKind::NamedCharacter
                | NodeKind::PosixBracketExpression
                | NodeKind::MysqlCharExpression
                | NodeKind::MysqlCharEqExpression
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The regular expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegExp {}

impl Language for RegExp {
    type TokenKind = TokenKind;
    type NodeKind = NodeKind;

    fn is_trivia(kind: TokenKind) -> bool {
        kind.is_trivia()
    }

    fn token_name(kind: TokenKind) -> &'static str {
        kind.name()
    }

    fn node_name(kind: NodeKind) -> &'static str {
        kind.name()
    }
}

pub type SyntaxTree = tree::Tree<RegExp>;
pub type SyntaxNode<'t> = tree::Node<'t, RegExp>;
pub type SyntaxToken<'t> = tree::TokenRef<'t, RegExp>;
pub type SyntaxElement<'t> = tree::Child<'t, RegExp>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(NodeKind::PyCondRef.name(), "PY_COND_REF");
        assert_eq!(NodeKind::File.to_string(), "FILE");
    }

    #[test]
    fn atoms_and_class_elements() {
        assert!(NodeKind::Closure.is_atom());
        assert!(!NodeKind::CharRange.is_atom());
        assert!(NodeKind::CharRange.is_class_element());
        assert!(!NodeKind::Group.is_class_element());
    }
}
