//! Unicode property and POSIX class names.
//!
//! The parser accepts any name that is lexically well formed. Whether the
//! name actually exists is a separate question answered by a
//! [`PropertyNames`] table, so embedders can plug in their own data. The
//! built-in [`DefaultPropertyNames`] covers the general categories, the
//! Java character classes and binary properties, and the common scripts.

use phf::{Map, Set, phf_map, phf_set};

use crate::ast::{PosixBracketExpression, Property};
use crate::diagnostic::Diagnostic;
use crate::parser::Parse;
use crate::syntax::SyntaxToken;
use crate::token::TokenKind;

/// Lookup of character category and property names.
pub trait PropertyNames {
    fn is_valid_category(&self, name: &str) -> bool;

    /// A human readable description of `name`, if it is known.
    fn describe(&self, name: &str) -> Option<String>;

    /// Whether `value` is a valid value of the property `key` in
    /// `\p{key=value}`. Unknown keys are never valid.
    fn is_valid_value(&self, key: &str, value: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPropertyNames;

const CATEGORIES: Map<&'static str, &'static str> = phf_map! {
    // general categories
    "C" => "Other",
    "Cc" => "Control",
    "Cf" => "Format",
    "Cn" => "Unassigned",
    "Co" => "Private use",
    "Cs" => "Surrogate",
    "L" => "Letter",
    "LC" => "Cased letter",
    "Ll" => "Lowercase letter",
    "Lm" => "Modifier letter",
    "Lo" => "Other letter",
    "Lt" => "Titlecase letter",
    "Lu" => "Uppercase letter",
    "M" => "Mark",
    "Mc" => "Spacing mark",
    "Me" => "Enclosing mark",
    "Mn" => "Nonspacing mark",
    "N" => "Number",
    "Nd" => "Decimal number",
    "Nl" => "Letter number",
    "No" => "Other number",
    "P" => "Punctuation",
    "Pc" => "Connector punctuation",
    "Pd" => "Dash punctuation",
    "Pe" => "Close punctuation",
    "Pf" => "Final punctuation",
    "Pi" => "Initial punctuation",
    "Po" => "Other punctuation",
    "Ps" => "Open punctuation",
    "S" => "Symbol",
    "Sc" => "Currency symbol",
    "Sk" => "Modifier symbol",
    "Sm" => "Math symbol",
    "So" => "Other symbol",
    "Z" => "Separator",
    "Zl" => "Line separator",
    "Zp" => "Paragraph separator",
    "Zs" => "Space separator",
    // POSIX classes as properties
    "Lower" => "Lower-case alphabetic character: [a-z]",
    "Upper" => "Upper-case alphabetic character: [A-Z]",
    "ASCII" => "All ASCII: [\\x00-\\x7F]",
    "Alpha" => "Alphabetic character: [\\p{Lower}\\p{Upper}]",
    "Digit" => "Decimal digit: [0-9]",
    "Alnum" => "Alphanumeric character: [\\p{Alpha}\\p{Digit}]",
    "Punct" => "Punctuation: one of !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    "Graph" => "Visible character: [\\p{Alnum}\\p{Punct}]",
    "Print" => "Printable character: [\\p{Graph}\\x20]",
    "Blank" => "Space or a tab: [ \\t]",
    "Cntrl" => "Control character: [\\x00-\\x1F\\x7F]",
    "XDigit" => "Hexadecimal digit: [0-9a-fA-F]",
    "Space" => "Whitespace character: [ \\t\\n\\x0B\\f\\r]",
    // java.lang.Character predicates
    "javaLowerCase" => "Equivalent to Character.isLowerCase()",
    "javaUpperCase" => "Equivalent to Character.isUpperCase()",
    "javaTitleCase" => "Equivalent to Character.isTitleCase()",
    "javaDigit" => "Equivalent to Character.isDigit()",
    "javaDefined" => "Equivalent to Character.isDefined()",
    "javaLetter" => "Equivalent to Character.isLetter()",
    "javaLetterOrDigit" => "Equivalent to Character.isLetterOrDigit()",
    "javaAlphabetic" => "Equivalent to Character.isAlphabetic()",
    "javaIdeographic" => "Equivalent to Character.isIdeographic()",
    "javaWhitespace" => "Equivalent to Character.isWhitespace()",
    "javaSpaceChar" => "Equivalent to Character.isSpaceChar()",
    "javaMirrored" => "Equivalent to Character.isMirrored()",
    "javaISOControl" => "Equivalent to Character.isISOControl()",
    "javaIdentifierIgnorable" => "Equivalent to Character.isIdentifierIgnorable()",
    "javaJavaIdentifierStart" => "Equivalent to Character.isJavaIdentifierStart()",
    "javaJavaIdentifierPart" => "Equivalent to Character.isJavaIdentifierPart()",
    "javaUnicodeIdentifierStart" => "Equivalent to Character.isUnicodeIdentifierStart()",
    "javaUnicodeIdentifierPart" => "Equivalent to Character.isUnicodeIdentifierPart()",
    // binary properties
    "Alphabetic" => "Alphabetic",
    "Ideographic" => "Ideographic",
    "Letter" => "Letter",
    "Lowercase" => "Lowercase",
    "Uppercase" => "Uppercase",
    "Titlecase" => "Titlecase",
    "Punctuation" => "Punctuation",
    "Control" => "Control",
    "White_Space" => "White space",
    "Digit_Value" => "Digit",
    "Hex_Digit" => "Hexadecimal digit",
    "Join_Control" => "Join control",
    "Noncharacter_Code_Point" => "Noncharacter code point",
    "Assigned" => "Assigned",
    "Emoji" => "Emoji",
    "Emoji_Presentation" => "Emoji presentation",
    "Emoji_Modifier" => "Emoji modifier",
    "Emoji_Modifier_Base" => "Emoji modifier base",
    "Emoji_Component" => "Emoji component",
    "Extended_Pictographic" => "Extended pictographic",
};

/// Script names, lower case. Scripts match case-insensitively.
const SCRIPTS: Set<&'static str> = phf_set! {
    "arabic", "armenian", "bengali", "bopomofo", "braille", "buhid",
    "canadian_aboriginal", "cherokee", "common", "coptic", "cyrillic",
    "deseret", "devanagari", "ethiopic", "georgian", "gothic", "greek",
    "gujarati", "gurmukhi", "han", "hangul", "hanunoo", "hebrew",
    "hiragana", "inherited", "kannada", "katakana", "khmer", "lao", "latin",
    "limbu", "malayalam", "mongolian", "myanmar", "ogham", "old_italic",
    "oriya", "runic", "sinhala", "syriac", "tagalog", "tagbanwa", "tai_le",
    "tamil", "telugu", "thaana", "thai", "tibetan", "unknown", "yi",
};

const POSIX_CLASSES: Set<&'static str> = phf_set! {
    "alnum", "alpha", "ascii", "blank", "cntrl", "digit", "graph", "lower",
    "print", "punct", "space", "upper", "word", "xdigit",
};

fn is_script(name: &str) -> bool {
    SCRIPTS.contains(name.to_ascii_lowercase().as_str())
}

/// `InGreek` and friends. Block names are not tabulated; any non-empty
/// identifier after `In` is accepted.
fn block_name(name: &str) -> Option<&str> {
    name.strip_prefix("In")
        .filter(|block| !block.is_empty())
        .filter(|block| block.chars().all(|c| c.is_ascii_alphanumeric() || "_ -".contains(c)))
}

impl PropertyNames for DefaultPropertyNames {
    fn is_valid_category(&self, name: &str) -> bool {
        if CATEGORIES.contains_key(name) || block_name(name).is_some() {
            return true;
        }
        name.strip_prefix("Is")
            .is_some_and(|rest| CATEGORIES.contains_key(rest) || is_script(rest))
    }

    fn describe(&self, name: &str) -> Option<String> {
        if let Some(description) = CATEGORIES.get(name) {
            return Some(description.to_string());
        }
        if let Some(block) = block_name(name) {
            return Some(format!("Block: {block}"));
        }
        let rest = name.strip_prefix("Is")?;
        if let Some(description) = CATEGORIES.get(rest) {
            Some(description.to_string())
        } else if is_script(rest) {
            Some(format!("Script: {rest}"))
        } else {
            None
        }
    }

    fn is_valid_value(&self, key: &str, value: &str) -> bool {
        match key.to_ascii_lowercase().as_str() {
            "script" | "sc" => is_script(value),
            "general_category" | "gc" => CATEGORIES.contains_key(value),
            "block" | "blk" => !value.is_empty(),
            _ => false,
        }
    }
}

pub fn is_posix_class_name(name: &str) -> bool {
    POSIX_CLASSES.contains(name)
}

/// Check every property and POSIX class name in `parse` against `names`.
///
/// Only well-formed names are checked; syntax errors are already part of
/// the parse diagnostics.
pub fn validate_names(parse: &Parse, names: &impl PropertyNames) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for node in parse.tree().root().descendants() {
        if let Some(property) = Property::cast(node) {
            check_property(property, names, &mut diagnostics);
        } else if let Some(bracket) = PosixBracketExpression::cast(node)
            && let Some(name) = bracket.syntax().child_token(TokenKind::Name)
            && !is_posix_class_name(name.text())
        {
            diagnostics.push(Diagnostic::new(name.span(), "Unknown POSIX character class"));
        }
    }
    diagnostics
}

fn check_property(
    property: Property<'_>,
    names: &impl PropertyNames,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let words: Vec<SyntaxToken<'_>> = property
        .syntax()
        .child_tokens()
        .filter(|t| matches!(t.kind(), TokenKind::Name | TokenKind::CategoryShortHand))
        .collect();
    match words.as_slice() {
        [] => {}
        [name] => {
            if !names.is_valid_category(name.text()) {
                diagnostics.push(Diagnostic::new(name.span(), "Unknown character category"));
            }
        }
        [key, value, ..] => {
            if !matches!(
                key.text().to_ascii_lowercase().as_str(),
                "script" | "sc" | "general_category" | "gc" | "block" | "blk"
            ) {
                diagnostics.push(Diagnostic::new(key.span(), "Unknown property name"));
            } else if !names.is_valid_value(key.text(), value.text()) {
                diagnostics.push(Diagnostic::new(value.span(), "Unknown property value"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::capability::CapabilitySet;
    use crate::dialect::Dialect;
    use crate::parser::parse;

    #[rstest]
    #[case("L", true)]
    #[case("Lu", true)]
    #[case("IsL", true)]
    #[case("IsLatin", true)]
    #[case("Isgreek", true)]
    #[case("InGreek", true)]
    #[case("javaLowerCase", true)]
    #[case("Alpha", true)]
    #[case("In", false)]
    #[case("Lx", false)]
    #[case("Latin", false)]
    #[case("", false)]
    fn categories(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(DefaultPropertyNames.is_valid_category(name), valid, "{name}");
    }

    #[test]
    fn descriptions() {
        let names = DefaultPropertyNames;
        assert_eq!(names.describe("Lu").as_deref(), Some("Uppercase letter"));
        assert_eq!(names.describe("IsLu").as_deref(), Some("Uppercase letter"));
        assert_eq!(names.describe("IsLatin").as_deref(), Some("Script: Latin"));
        assert_eq!(names.describe("InGreek").as_deref(), Some("Block: Greek"));
        assert_eq!(names.describe("Nope"), None);
    }

    #[test]
    fn property_values() {
        let names = DefaultPropertyNames;
        assert!(names.is_valid_value("Script", "Greek"));
        assert!(names.is_valid_value("gc", "Lu"));
        assert!(!names.is_valid_value("sc", "Klingon"));
        assert!(!names.is_valid_value("color", "red"));
    }

    #[test]
    fn unknown_category_is_reported_at_its_name() {
        let parsed = parse(r"a\p{Foo}\pL\p{IsLatin}", CapabilitySet::DEFAULT);
        assert!(!parsed.has_errors());
        assert_eq!(
            validate_names(&parsed, &DefaultPropertyNames),
            vec![Diagnostic::new(4..7, "Unknown character category")]
        );
    }

    #[test]
    fn shorthand_category() {
        let parsed = parse(r"\pQ", CapabilitySet::DEFAULT);
        assert_eq!(
            validate_names(&parsed, &DefaultPropertyNames),
            vec![Diagnostic::new(2..3, "Unknown character category")]
        );
    }

    #[test]
    fn key_value_properties() {
        let parsed = parse(r"\p{sc=Greek}\p{sc=Klingon}\p{color=red}", CapabilitySet::DEFAULT);
        assert!(!parsed.has_errors());
        assert_eq!(
            validate_names(&parsed, &DefaultPropertyNames),
            vec![
                Diagnostic::new(18..25, "Unknown property value"),
                Diagnostic::new(29..34, "Unknown property name"),
            ]
        );
    }

    #[test]
    fn posix_class_names() {
        let parsed = parse("[[:alpha:][:nope:]]", Dialect::Posix.capabilities());
        assert!(!parsed.has_errors());
        assert_eq!(
            validate_names(&parsed, &DefaultPropertyNames),
            vec![Diagnostic::new(12..16, "Unknown POSIX character class")]
        );
    }

    #[test]
    fn malformed_properties_are_left_to_the_parser() {
        let parsed = parse(r"\p{", CapabilitySet::DEFAULT);
        assert!(parsed.has_errors());
        assert!(validate_names(&parsed, &DefaultPropertyNames).is_empty());
    }
}
