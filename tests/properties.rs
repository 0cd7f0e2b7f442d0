//! Property tests: the lexer and parser accept any input under any
//! capability set, and the tree they build always covers the input exactly.

use itertools::Itertools;
use proptest::prelude::*;
use regexp_lang::{Capability, CapabilitySet, SyntaxNode, parse, tokenize};

fn capabilities() -> impl Strategy<Value = CapabilitySet> {
    prop::sample::subsequence(Capability::ALL.to_vec(), 0..=Capability::ALL.len())
        .prop_map(CapabilitySet::new)
}

/// Mostly regex metacharacters, so generated inputs hit the interesting
/// states often.
fn regex_like() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => r"[a-z0-9\\()\[\]{}|*+?.^$:,<>='!#&\-PpkgxuNQE\n ]{0,40}",
        1 => ".{0,24}",
    ]
}

/// Children are ordered, adjacent, and together span their parent.
fn check_ranges(node: SyntaxNode<'_>) -> Result<(), TestCaseError> {
    let span = node.span();
    prop_assert!(span.start <= span.end);
    let children: Vec<_> = node.children().collect();
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        prop_assert_eq!(first.span().start, span.start);
        prop_assert_eq!(last.span().end, span.end);
    }
    for (a, b) in children.iter().tuple_windows() {
        prop_assert_eq!(a.span().end, b.span().start, "gap or overlap under {:?}", node);
    }
    for child in node.child_nodes() {
        check_ranges(child)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn tokens_cover_the_input(text in regex_like(), caps in capabilities()) {
        let tokens = tokenize(&text, caps);
        let mut pos = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start, pos);
            prop_assert!(!token.is_empty());
            pos = token.span.end;
        }
        prop_assert_eq!(pos, text.len());
    }

    #[test]
    fn tree_covers_the_input(text in regex_like(), caps in capabilities()) {
        let parsed = parse(&text, caps);
        let root = parsed.tree().root();
        prop_assert_eq!(root.span(), 0..text.len());
        prop_assert_eq!(root.text(), text.as_str());
        check_ranges(root)?;
    }

    #[test]
    fn tree_keeps_every_token(text in regex_like(), caps in capabilities()) {
        let parsed = parse(&text, caps);
        let expected = tokenize(&text, caps);
        prop_assert_eq!(parsed.tree().tokens(), expected.as_slice());
    }

    #[test]
    fn diagnostics_are_bounded(text in regex_like(), caps in capabilities()) {
        let parsed = parse(&text, caps);
        prop_assert!(parsed.diagnostics().len() <= 3 * text.len() + 1);
        for diagnostic in parsed.diagnostics() {
            prop_assert!(diagnostic.span.start <= diagnostic.span.end);
            prop_assert!(diagnostic.span.end <= text.len());
        }
        prop_assert!(
            parsed
                .diagnostics()
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.span.start <= b.span.start)
        );
    }

    #[test]
    fn capturing_count_matches_lexer(text in regex_like(), caps in capabilities()) {
        let mut lexer = regexp_lang::Lexer::new(&text, caps);
        lexer.by_ref().for_each(drop);
        prop_assert_eq!(parse(&text, caps).capturing_group_count(), lexer.capturing_group_count());
    }
}
