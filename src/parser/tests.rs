use rstest::rstest;

use super::*;
use crate::dialect::Dialect;

fn parse_default(text: &str) -> Parse {
    parse(text, CapabilitySet::DEFAULT)
}

fn messages(parse: &Parse) -> Vec<&str> {
    parse
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect()
}

fn node_kinds(parse: &Parse) -> Vec<NodeKind> {
    parse.tree().root().descendants().map(|n| n.kind()).collect()
}

fn nodes_of(parse: &Parse, kind: NodeKind) -> Vec<&str> {
    parse
        .tree()
        .root()
        .descendants()
        .filter(|n| n.kind() == kind)
        .map(|n| n.text())
        .collect()
}

#[test]
fn single_character() {
    assert_eq!(
        parse_default("a").tree().debug_dump(),
        "FILE@0..1
  PATTERN@0..1
    BRANCH@0..1
      CHAR@0..1
        CHARACTER@0..1 \"a\"
"
    );
}

#[test]
fn alternation_and_closure() {
    let parse = parse_default("ab|c*");
    assert!(!parse.has_errors());
    assert_eq!(
        parse.tree().debug_dump(),
        "FILE@0..5
  PATTERN@0..5
    BRANCH@0..2
      CHAR@0..1
        CHARACTER@0..1 \"a\"
      CHAR@1..2
        CHARACTER@1..2 \"b\"
    UNION@2..3 \"|\"
    BRANCH@3..5
      CLOSURE@3..5
        CHAR@3..4
          CHARACTER@3..4 \"c\"
        QUANTIFIER@4..5
          STAR@4..5 \"*\"
"
    );
}

#[test]
fn empty_input_has_an_empty_branch() {
    assert_eq!(
        parse_default("").tree().debug_dump(),
        "FILE@0..0\n  PATTERN@0..0\n    BRANCH@0..0\n"
    );
}

#[test]
fn empty_alternative() {
    let parse = parse_default("a|");
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::Branch), vec!["a", ""]);
}

#[test]
fn property_with_braces_is_clean_by_default() {
    let parse = parse_default(r"\p{L}");
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::Property), vec![r"\p{L}"]);
}

#[test]
fn category_shorthand_depends_on_capability() {
    let with = parse_default(r"\pL");
    assert!(!with.has_errors());

    let caps = CapabilitySet::DEFAULT.without(Capability::UnicodeCategoryShorthand);
    let without = parse(r"\pL", caps);
    assert_eq!(
        without.diagnostics(),
        [Diagnostic::new(
            2..3,
            "Category shorthand not allowed in this regular expression dialect"
        )]
    );
    assert_eq!(node_kinds(&with), node_kinds(&without));
    assert_eq!(nodes_of(&without, NodeKind::Property), vec![r"\pL"]);
}

#[test]
fn trailing_minus_before_class_end_is_literal() {
    let parse = parse_default("[a-]");
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::Char), vec!["a", "-"]);
    assert!(nodes_of(&parse, NodeKind::CharRange).is_empty());
}

#[test]
fn minus_before_nested_class_is_literal() {
    let parse = parse_default("[a-[b]]");
    assert!(!parse.has_errors());
    let class = parse
        .tree()
        .root()
        .descendants()
        .find(|n| n.kind() == NodeKind::Class);
    let children: Vec<_> = class
        .into_iter()
        .flat_map(|c| c.child_nodes())
        .map(|n| (n.kind(), n.text()))
        .collect();
    assert_eq!(
        children,
        vec![
            (NodeKind::Char, "a"),
            (NodeKind::Char, "-"),
            (NodeKind::Class, "[b]"),
        ]
    );
}

#[test]
fn unclosed_group_keeps_its_branch() {
    let parse = parse_default("(abc");
    assert_eq!(
        parse.diagnostics(),
        [Diagnostic::new(4..4, "Unclosed group")]
    );
    assert_eq!(nodes_of(&parse, NodeKind::Group), vec!["(abc"]);
    assert!(nodes_of(&parse, NodeKind::Branch).contains(&"abc"));
}

#[test]
fn omitted_minimum_needs_capability() {
    let rejected = parse_default("a{,5}");
    assert_eq!(messages(&rejected), vec!["Number expected"]);

    let caps = CapabilitySet::DEFAULT.with(Capability::OmitNumbersInQuantifiers);
    let accepted = parse("a{,5}", caps);
    assert!(!accepted.has_errors());
    assert_eq!(nodes_of(&accepted, NodeKind::Quantifier), vec!["{,5}"]);
    assert_eq!(nodes_of(&accepted, NodeKind::Number), vec!["5"]);
}

#[test]
fn counted_quantifiers() {
    for text in ["a{2}", "a{2,}", "a{2,3}?", "a*+", "a??"] {
        let parse = parse_default(text);
        assert!(!parse.has_errors(), "{text}: {:?}", parse.diagnostics());
        assert_eq!(nodes_of(&parse, NodeKind::Quantifier), vec![&text[1..]]);
    }
}

#[test]
fn brace_without_number() {
    let java = parse_default("a{x}");
    assert_eq!(
        java.diagnostics(),
        [Diagnostic::new(2..3, "Number expected")]
    );
    let python = parse("a{x}", Dialect::Python.capabilities());
    assert!(!python.has_errors());
    assert_eq!(nodes_of(&python, NodeKind::Char).len(), 4);
}

#[test]
fn wrapping_in_non_capturing_group_adds_one_group() {
    let samples = [
        "a",
        "ab*",
        "[a-z]+",
        "(x)(y)",
        "a|b",
        r"\d{2,3}",
        r"(?<n>a)\k<n>",
        r"\p{Lu}\b",
    ];
    for sample in samples {
        let plain = parse_default(sample);
        let wrapped = parse_default(&format!("(?:{sample})"));
        assert!(!plain.has_errors(), "{sample}");
        assert!(!wrapped.has_errors(), "{sample}");
        assert_eq!(
            nodes_of(&wrapped, NodeKind::Group).len(),
            nodes_of(&plain, NodeKind::Group).len() + 1,
            "{sample}"
        );
    }
}

#[test]
fn unmatched_closing_paren() {
    let parse = parse_default("a)b");
    assert_eq!(
        parse.diagnostics(),
        [
            Diagnostic::new(1..2, "Unmatched closing ')'"),
            Diagnostic::new(2..3, "Pattern expected"),
        ]
    );
    assert_eq!(parse.tree().root().span(), 0..3);
}

#[test]
fn leading_quantifier_dangles() {
    let parse = parse_default("*a");
    assert_eq!(messages(&parse)[0], "Dangling metacharacter");
}

#[test]
fn named_groups_and_references() {
    let parse = parse_default(r"(?<n>a)\k<n>");
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::NamedGroupRef), vec![r"\k<n>"]);

    let python = parse_with_dialect("(?P<n>a)(?P=n)", Dialect::Python);
    assert!(!python.has_errors());
    assert_eq!(nodes_of(&python, NodeKind::Group), vec!["(?P<n>a)"]);
    assert_eq!(nodes_of(&python, NodeKind::NamedGroupRef), vec!["(?P=n)"]);
}

fn parse_with_dialect(text: &str, dialect: Dialect) -> Parse {
    parse(text, dialect.capabilities())
}

#[test]
fn missing_group_name() {
    let parse = parse_default("(?<>a)");
    assert_eq!(
        parse.diagnostics(),
        [Diagnostic::new(3..4, "Group name expected")]
    );
}

#[test]
fn inline_options() {
    let parse = parse_default("(?i)a(?x:b c)");
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::SetOptions), vec!["(?i)"]);
    assert_eq!(nodes_of(&parse, NodeKind::Options), vec!["i", "x"]);
    assert_eq!(nodes_of(&parse, NodeKind::Group), vec!["(?x:b c)"]);
}

#[test]
fn unclosed_options_group() {
    let parse = parse_default("(?i");
    assert_eq!(messages(&parse), vec!["Unclosed options group"]);
}

#[test]
fn conditionals() {
    let parse = parse_with_dialect("(a)(?(1)b|c)", Dialect::Pcre);
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::PyCondRef), vec!["(?(1)b|c)"]);
    assert_eq!(nodes_of(&parse, NodeKind::Branch).len(), 4);

    let missing = parse_default("(?()a)");
    assert_eq!(messages(&missing), vec!["Group name or number expected"]);
}

#[test]
fn numbered_group_reference_builds_backref() {
    let pcre = parse_with_dialect("(a)(?1)(?R)", Dialect::Pcre);
    assert!(!pcre.has_errors());
    assert_eq!(nodes_of(&pcre, NodeKind::Backref), vec!["(?1)", "(?R)"]);
}

#[rstest]
#[case(r"\pL", Capability::UnicodeCategoryShorthand)]
#[case(r"\P{^L}", Capability::CaretNegatedProperties)]
#[case(r"\p{Script=Greek}", Capability::PropertyValues)]
#[case("(a)(?1)", Capability::PcreNumberedGroupRef)]
#[case(r"(a)\g1", Capability::PcreBackReferences)]
#[case(r"(?<n>a)\k{n}", Capability::PcreBackReferences)]
#[case("(?(<n>)a)", Capability::PcreConditions)]
#[case("a{,5}", Capability::OmitNumbersInQuantifiers)]
#[case("a{,}", Capability::OmitBothNumbersInQuantifiers)]
#[case(r"\l", Capability::TransformationEscapes)]
#[case(r"\u", Capability::TransformationEscapes)]
#[case(r"\x4", Capability::OneHexCharEscape)]
fn dialect_gated_syntax(#[case] text: &str, #[case] capability: Capability) {
    let with = parse(text, CapabilitySet::DEFAULT.with(capability));
    let without = parse(text, CapabilitySet::DEFAULT.without(capability));
    assert!(!with.has_errors(), "{:?}", with.diagnostics());
    assert_eq!(without.diagnostics().len(), 1, "{:?}", without.diagnostics());
    assert_eq!(node_kinds(&with), node_kinds(&without));
}

#[rstest]
#[case(r"\x4", "Illegal hexadecimal escape sequence", 0..3)]
#[case(r"\0", "Illegal octal escape sequence", 0..2)]
#[case(r"a\y", "Illegal/unsupported escape sequence", 1..3)]
fn bad_escapes_become_chars(
    #[case] text: &str,
    #[case] message: &str,
    #[case] span: std::ops::Range<usize>,
) {
    let parse = parse_with_dialect(text, Dialect::Java);
    assert_eq!(parse.diagnostics(), [Diagnostic::new(span.clone(), message)]);
    let chars: Vec<_> = parse
        .tree()
        .root()
        .descendants()
        .filter(|n| n.kind() == NodeKind::Char)
        .map(|n| n.span())
        .collect();
    assert!(chars.contains(&span));
}

#[test]
fn class_intersection() {
    let parse = parse_default("[a-z&&[^aeiou]]");
    assert!(!parse.has_errors());
    assert_eq!(
        nodes_of(&parse, NodeKind::Intersection),
        vec!["a-z&&[^aeiou]"]
    );
    assert_eq!(nodes_of(&parse, NodeKind::CharRange), vec!["a-z"]);
}

#[test]
fn illegal_range() {
    let parse = parse_default(r"[a-\d]");
    assert_eq!(
        parse.diagnostics(),
        [Diagnostic::new(3..5, "Illegal character range")]
    );
    assert_eq!(nodes_of(&parse, NodeKind::CharRange), vec!["a-"]);
    assert_eq!(nodes_of(&parse, NodeKind::SimpleClass), vec![r"\d"]);
}

#[test]
fn unclosed_class() {
    let parse = parse_default("[ab");
    assert_eq!(
        parse.diagnostics(),
        [Diagnostic::new(3..3, "Unclosed character class")]
    );
}

#[test]
fn posix_and_mysql_bracket_expressions() {
    let posix = parse_with_dialect("[[:alpha:][:^digit:]]", Dialect::Posix);
    assert!(!posix.has_errors());
    assert_eq!(
        nodes_of(&posix, NodeKind::PosixBracketExpression),
        vec!["[:alpha:]", "[:^digit:]"]
    );

    let mysql = parse_with_dialect("[[.space.][=e=]]", Dialect::Mysql);
    assert!(!mysql.has_errors());
    assert_eq!(
        nodes_of(&mysql, NodeKind::MysqlCharExpression),
        vec!["[.space.]"]
    );
    assert_eq!(
        nodes_of(&mysql, NodeKind::MysqlCharEqExpression),
        vec!["[=e=]"]
    );
}

#[test]
fn named_character_in_range() {
    let parse = parse_default(r"[\N{DIGIT ZERO}-9]");
    assert!(!parse.has_errors());
    assert_eq!(
        nodes_of(&parse, NodeKind::CharRange),
        vec![r"\N{DIGIT ZERO}-9"]
    );
}

#[test]
fn trivia_stays_in_the_tree() {
    let parse = parse_default(r"\Qa*\E+");
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::Closure), vec![r"*\E+"]);

    let comments = parse_default("(?x) a # c");
    assert!(!comments.has_errors());
    assert!(
        comments
            .tree()
            .root()
            .child_token(TokenKind::Comment)
            .is_some()
    );
}

#[test]
fn capturing_groups_are_counted() {
    let parse = parse_default("(a)(?:b)(?<n>c)");
    assert_eq!(parse.capturing_group_count(), 2);
    assert!(parse.has_capturing_groups());
    assert!(!parse_default("(?:a)").has_capturing_groups());
}

#[test]
fn deep_nesting_is_cut_off() {
    let depth = MAX_NESTING_DEPTH + 20;
    let text = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    let parse = parse_default(&text);
    assert!(messages(&parse).contains(&"Pattern nested too deeply"));
    assert_eq!(parse.tree().root().span(), 0..text.len());

    let classes = format!("{}a{}", "[".repeat(depth), "]".repeat(depth));
    let parse = parse_default(&classes);
    assert!(messages(&parse).contains(&"Pattern nested too deeply"));
}

#[test]
fn shallow_nesting_is_fine() {
    let depth = MAX_NESTING_DEPTH;
    let text = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    let parse = parse_default(&text);
    assert!(!parse.has_errors());
    assert_eq!(nodes_of(&parse, NodeKind::Group).len(), depth);
}

#[test]
fn empty_bounds_still_close_the_quantifier() {
    let parse = parse_default("a{}b");
    assert_eq!(parse.diagnostics(), [Diagnostic::new(2..3, "Number expected")]);
    assert_eq!(nodes_of(&parse, NodeKind::Quantifier), vec!["{}"]);
    assert_eq!(nodes_of(&parse, NodeKind::Char), vec!["a", "b"]);
}

#[test]
fn omitting_both_bounds_is_enough_for_an_open_minimum() {
    let dangling = CapabilitySet::new([Capability::DanglingMetacharacters]);
    let literal = parse("a{,}", dangling);
    assert!(!literal.has_errors());
    assert!(nodes_of(&literal, NodeKind::Quantifier).is_empty());

    let both = parse("a{,}", dangling.with(Capability::OmitBothNumbersInQuantifiers));
    assert!(!both.has_errors(), "{:?}", both.diagnostics());
    assert_eq!(nodes_of(&both, NodeKind::Quantifier), vec!["{,}"]);

    let open_min = parse("a{,3}", CapabilitySet::new([Capability::OmitBothNumbersInQuantifiers]));
    assert!(!open_min.has_errors(), "{:?}", open_min.diagnostics());
}

#[test]
fn oversized_repetition_is_reported() {
    let parse = parse_default("a{99999999999}");
    assert_eq!(
        parse.diagnostics(),
        [Diagnostic::new(2..13, "Repetition value too large")]
    );
    assert_eq!(nodes_of(&parse, NodeKind::Number), vec!["99999999999"]);
}

#[test]
fn stray_closers_dangle_when_dangling_is_forbidden() {
    let strict = CapabilitySet::DEFAULT.with(Capability::NoDanglingMetacharacters);
    for text in ["a]", "a}"] {
        assert_eq!(
            parse(text, strict).diagnostics(),
            [Diagnostic::new(1..2, "Dangling metacharacter")],
            "{text}"
        );
    }
    assert!(!parse_default("a]}").has_errors());
}
