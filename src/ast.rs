//! Typed views over CST nodes.
//!
//! Each view wraps a [`SyntaxNode`] of one kind and reads its tokens on
//! demand. Views never fail on malformed nodes; missing parts read as
//! `None`.

use crate::syntax::{NodeKind, SyntaxNode, SyntaxToken};
use crate::token::TokenKind;

/// Non-trivia tokens directly under `node`.
fn significant_tokens<'t>(node: SyntaxNode<'t>) -> impl Iterator<Item = SyntaxToken<'t>> {
    node.child_tokens().filter(|t| !t.is_trivia())
}

macro_rules! view {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'t>(SyntaxNode<'t>);

        impl<'t> $name<'t> {
            pub fn cast(node: SyntaxNode<'t>) -> Option<Self> {
                (node.kind() == $kind).then_some(Self(node))
            }

            pub fn syntax(&self) -> SyntaxNode<'t> {
                self.0
            }
        }
    };
}

view!(
    /// `*`, `+`, `?` or `{min,max}`, with an optional `?`/`+` suffix.
    Quantifier,
    NodeKind::Quantifier
);
view!(
    /// `\p{...}`, `\P{...}` or a shorthand like `\pL`.
    Property,
    NodeKind::Property
);
view!(Group, NodeKind::Group);
view!(PosixBracketExpression, NodeKind::PosixBracketExpression);

impl Quantifier<'_> {
    fn first_kind(&self) -> Option<TokenKind> {
        significant_tokens(self.0).next().map(|t| t.kind())
    }

    fn suffix(&self) -> Option<TokenKind> {
        let mut tokens = significant_tokens(self.0);
        tokens.next()?;
        tokens.last().map(|t| t.kind())
    }

    /// Whether this is the `{...}` form.
    pub fn is_counted(&self) -> bool {
        self.first_kind() == Some(TokenKind::LBrace)
    }

    /// Explicit or implied lower bound; `None` when omitted (`{,5}`) or
    /// too large for a `u32`, which the parser reports.
    pub fn min(&self) -> Option<u32> {
        self.bounds().0
    }

    /// Explicit or implied upper bound; `None` when unbounded or omitted.
    pub fn max(&self) -> Option<u32> {
        self.bounds().1
    }

    fn bounds(&self) -> (Option<u32>, Option<u32>) {
        match self.first_kind() {
            Some(TokenKind::Star) => (Some(0), None),
            Some(TokenKind::Plus) => (Some(1), None),
            Some(TokenKind::Quest) => (Some(0), Some(1)),
            _ => {
                let mut min = None;
                let mut max = None;
                let mut comma = false;
                for child in self.0.children() {
                    if let Some(number) = child.as_node() {
                        let value = number.text().parse().ok();
                        if comma {
                            max = value;
                        } else {
                            min = value;
                        }
                    } else if child.as_token().is_some_and(|t| t.kind() == TokenKind::Comma) {
                        comma = true;
                    }
                }
                if comma { (min, max) } else { (min, min) }
            }
        }
    }

    pub fn is_reluctant(&self) -> bool {
        self.suffix() == Some(TokenKind::Quest)
    }

    pub fn is_possessive(&self) -> bool {
        self.suffix() == Some(TokenKind::Plus)
    }
}

impl<'t> Property<'t> {
    pub fn is_shorthand(&self) -> bool {
        self.0.child_token(TokenKind::CategoryShortHand).is_some()
    }

    /// The category or property name: `L` in `\pL`, `Script` in
    /// `\p{Script=Greek}`.
    pub fn name(&self) -> Option<&'t str> {
        significant_tokens(self.0)
            .find(|t| matches!(t.kind(), TokenKind::CategoryShortHand | TokenKind::Name))
            .map(|t| t.text())
    }

    /// `Greek` in `\p{Script=Greek}`.
    pub fn value(&self) -> Option<&'t str> {
        significant_tokens(self.0)
            .skip_while(|t| t.kind() != TokenKind::Eq)
            .find(|t| t.kind() == TokenKind::Name)
            .map(|t| t.text())
    }

    /// `\P` and `^` each negate; together they cancel out.
    pub fn is_negated(&self) -> bool {
        let upper = self.0.text().starts_with("\\P");
        let caret = self.0.child_token(TokenKind::Caret).is_some();
        upper != caret
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Capturing,
    NonCapturing,
    Atomic,
    PositiveLookahead,
    NegativeLookahead,
    PositiveLookbehind,
    NegativeLookbehind,
    /// `(?P<name>...)`
    PythonNamed,
    /// `(?<name>...)`
    Named,
    /// `(?'name'...)`
    QuotedNamed,
    /// `(?flags:...)`
    Options,
}

impl<'t> Group<'t> {
    pub fn kind(&self) -> Option<GroupKind> {
        let opener = significant_tokens(self.0).next()?;
        let kind = match opener.kind() {
            TokenKind::GroupBegin => GroupKind::Capturing,
            TokenKind::NonCaptGroup => GroupKind::NonCapturing,
            TokenKind::AtomicGroup => GroupKind::Atomic,
            TokenKind::PosLookahead => GroupKind::PositiveLookahead,
            TokenKind::NegLookahead => GroupKind::NegativeLookahead,
            TokenKind::PosLookbehind => GroupKind::PositiveLookbehind,
            TokenKind::NegLookbehind => GroupKind::NegativeLookbehind,
            TokenKind::PythonNamedGroup => GroupKind::PythonNamed,
            TokenKind::RubyNamedGroup => GroupKind::Named,
            TokenKind::RubyQuotedNamedGroup => GroupKind::QuotedNamed,
            TokenKind::SetOptions => GroupKind::Options,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> Option<&'t str> {
        self.0.child_token(TokenKind::Name).map(|t| t.text())
    }

    pub fn is_capturing(&self) -> bool {
        matches!(
            self.kind(),
            Some(
                GroupKind::Capturing
                    | GroupKind::PythonNamed
                    | GroupKind::Named
                    | GroupKind::QuotedNamed
            )
        )
    }
}

impl<'t> PosixBracketExpression<'t> {
    pub fn class_name(&self) -> Option<&'t str> {
        self.0.child_token(TokenKind::Name).map(|t| t.text())
    }

    pub fn is_negated(&self) -> bool {
        self.0.child_token(TokenKind::Caret).is_some()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::capability::{Capability, CapabilitySet};
    use crate::dialect::Dialect;
    use crate::parser::{Parse, parse};

    fn first<'t, T>(parsed: &'t Parse, cast: fn(SyntaxNode<'t>) -> Option<T>) -> Option<T> {
        parsed.tree().root().descendants().find_map(cast)
    }

    #[rstest]
    #[case("a*", Some(0), None)]
    #[case("a+", Some(1), None)]
    #[case("a?", Some(0), Some(1))]
    #[case("a{3}", Some(3), Some(3))]
    #[case("a{3,}", Some(3), None)]
    #[case("a{2,7}", Some(2), Some(7))]
    #[case("a{,5}", None, Some(5))]
    #[case("a{99999999999}", None, None)]
    fn quantifier_bounds(#[case] text: &str, #[case] min: Option<u32>, #[case] max: Option<u32>) {
        let caps = CapabilitySet::DEFAULT.with(Capability::OmitNumbersInQuantifiers);
        let parsed = parse(text, caps);
        let q = first(&parsed, Quantifier::cast);
        assert_eq!(q.map(|q| (q.min(), q.max())), Some((min, max)), "{text}");
    }

    #[test]
    fn quantifier_suffixes() {
        let parsed = parse("a*?b{2}+c+", CapabilitySet::DEFAULT);
        let flags: Vec<_> = parsed
            .tree()
            .root()
            .descendants()
            .filter_map(Quantifier::cast)
            .map(|q| (q.is_counted(), q.is_reluctant(), q.is_possessive()))
            .collect();
        assert_eq!(
            flags,
            vec![(false, true, false), (true, false, true), (false, false, false)]
        );
    }

    #[test]
    fn property_parts() {
        let parsed = parse(r"\P{^Script=Greek}", CapabilitySet::DEFAULT);
        let p = first(&parsed, Property::cast);
        assert_eq!(p.and_then(|p| p.name()), Some("Script"));
        assert_eq!(p.and_then(|p| p.value()), Some("Greek"));
        assert_eq!(p.map(|p| p.is_negated()), Some(false));

        let parsed = parse(r"\PL", CapabilitySet::DEFAULT);
        let p = first(&parsed, Property::cast);
        assert_eq!(p.and_then(|p| p.name()), Some("L"));
        assert_eq!(p.map(|p| (p.is_shorthand(), p.is_negated())), Some((true, true)));
    }

    #[test]
    fn group_kinds() {
        let parsed = parse("(a)(?:b)(?<n>c)(?i:d)(?<!e)", CapabilitySet::DEFAULT);
        let groups: Vec<_> = parsed
            .tree()
            .root()
            .descendants()
            .filter_map(Group::cast)
            .map(|g| (g.kind(), g.name(), g.is_capturing()))
            .collect();
        assert_eq!(
            groups,
            vec![
                (Some(GroupKind::Capturing), None, true),
                (Some(GroupKind::NonCapturing), None, false),
                (Some(GroupKind::Named), Some("n"), true),
                (Some(GroupKind::Options), None, false),
                (Some(GroupKind::NegativeLookbehind), None, false),
            ]
        );
    }

    #[test]
    fn posix_bracket_parts() {
        let parsed = parse("[[:^alpha:]]", Dialect::Posix.capabilities());
        let e = first(&parsed, PosixBracketExpression::cast);
        assert_eq!(e.and_then(|e| e.class_name()), Some("alpha"));
        assert_eq!(e.map(|e| e.is_negated()), Some(true));
    }

    #[test]
    fn cast_checks_kind() {
        let parsed = parse("a", CapabilitySet::DEFAULT);
        assert!(Group::cast(parsed.tree().root()).is_none());
        assert!(first(&parsed, Quantifier::cast).is_none());
    }
}
