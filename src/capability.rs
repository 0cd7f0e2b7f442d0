//! Dialect capabilities.
//!
//! A [`Capability`] is a named switch that makes one piece of regular
//! expression syntax legal, or changes how it is read. A [`CapabilitySet`]
//! is an immutable bitset of them; it is `Copy` and can be shared freely
//! between parses.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use phf::{Map, phf_map};

/// One dialect switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Capability {
    /// XML Schema regular expressions: `^`/`$` are literals, `\i \I \c \C` are classes.
    XmlSchemaMode,
    /// `{`, `}` and `]` are literal characters when they cannot be structural.
    DanglingMetacharacters,
    /// `{`, `}` and `]` are always structural. Overrides [`Capability::DanglingMetacharacters`].
    NoDanglingMetacharacters,
    /// `[` inside a class opens a nested class; `&&` intersects classes.
    NestedCharacterClasses,
    /// Octal escapes are written `\NNN` / `\0NN` instead of requiring `\0`.
    OctalNoLeadingZero,
    /// The lower quantifier bound may be omitted: `{,n}`.
    OmitNumbersInQuantifiers,
    /// Both quantifier bounds may be omitted: `{,}`.
    OmitBothNumbersInQuantifiers,
    /// Comment mode is on from the start of the pattern.
    CommentMode,
    /// Comment mode whitespace and comments also apply inside classes.
    WhitespaceInClass,
    /// `\h` / `\H` denote hex digit classes.
    AllowHexDigitClass,
    /// `[]` is an empty class rather than a class starting with `]`.
    AllowEmptyCharacterClass,
    /// `\h` `\H` `\v` `\V` denote horizontal and vertical whitespace classes.
    AllowHorizontalWhitespaceClass,
    /// `\pL` is accepted as shorthand for `\p{L}`.
    UnicodeCategoryShorthand,
    /// `[:alpha:]` style POSIX bracket expressions inside classes.
    PosixBracketExpressions,
    /// `\p{^L}` negates a property.
    CaretNegatedProperties,
    /// `\p{Name=Value}` property values.
    PropertyValues,
    /// `\l \u \L \U \E` case transformation escapes.
    TransformationEscapes,
    /// Octal escapes may not exceed `\177`.
    MaxOctal177,
    /// Octal escapes may not exceed `\377`.
    MaxOctal377,
    /// Octal escapes need at least two digits.
    MinOctal2Digits,
    /// Octal escapes need at least three digits.
    MinOctal3Digits,
    /// `\x{h..h}` and `\u{h..h}` escapes.
    ExtendedUnicodeCharacter,
    /// `\xh` with a single hex digit.
    OneHexCharEscape,
    /// MySQL `[.x.]` and `[=x=]` bracket expressions.
    MysqlBracketExpressions,
    /// PCRE `\g` back references and `\k{name}` references.
    PcreBackReferences,
    /// PCRE `(?1)`, `(?-1)`, `(?+1)` and `(?R)` group references.
    PcreNumberedGroupRef,
    /// PCRE `(?(<name>)...)` and `(?('name')...)` conditions.
    PcreConditions,
}

const NAME_TO_CAPABILITY_MAP: Map<&'static str, Capability> = phf_map! {
    "XML_SCHEMA_MODE" => Capability::XmlSchemaMode,
    "DANGLING_METACHARACTERS" => Capability::DanglingMetacharacters,
    "NO_DANGLING_METACHARACTERS" => Capability::NoDanglingMetacharacters,
    "NESTED_CHARACTER_CLASSES" => Capability::NestedCharacterClasses,
    "OCTAL_NO_LEADING_ZERO" => Capability::OctalNoLeadingZero,
    "OMIT_NUMBERS_IN_QUANTIFIERS" => Capability::OmitNumbersInQuantifiers,
    "OMIT_BOTH_NUMBERS_IN_QUANTIFIERS" => Capability::OmitBothNumbersInQuantifiers,
    "COMMENT_MODE" => Capability::CommentMode,
    "WHITESPACE_IN_CLASS" => Capability::WhitespaceInClass,
    "ALLOW_HEX_DIGIT_CLASS" => Capability::AllowHexDigitClass,
    "ALLOW_EMPTY_CHARACTER_CLASS" => Capability::AllowEmptyCharacterClass,
    "ALLOW_HORIZONTAL_WHITESPACE_CLASS" => Capability::AllowHorizontalWhitespaceClass,
    "UNICODE_CATEGORY_SHORTHAND" => Capability::UnicodeCategoryShorthand,
    "POSIX_BRACKET_EXPRESSIONS" => Capability::PosixBracketExpressions,
    "CARET_NEGATED_PROPERTIES" => Capability::CaretNegatedProperties,
    "PROPERTY_VALUES" => Capability::PropertyValues,
    "TRANSFORMATION_ESCAPES" => Capability::TransformationEscapes,
    "MAX_OCTAL_177" => Capability::MaxOctal177,
    "MAX_OCTAL_377" => Capability::MaxOctal377,
    "MIN_OCTAL_2_DIGITS" => Capability::MinOctal2Digits,
    "MIN_OCTAL_3_DIGITS" => Capability::MinOctal3Digits,
    "EXTENDED_UNICODE_CHARACTER" => Capability::ExtendedUnicodeCharacter,
    "ONE_HEX_CHAR_ESCAPE" => Capability::OneHexCharEscape,
    "MYSQL_BRACKET_EXPRESSIONS" => Capability::MysqlBracketExpressions,
    "PCRE_BACK_REFERENCES" => Capability::PcreBackReferences,
    "PCRE_NUMBERED_GROUP_REF" => Capability::PcreNumberedGroupRef,
    "PCRE_CONDITIONS" => Capability::PcreConditions,
};

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 27] = [
        Capability::XmlSchemaMode,
        Capability::DanglingMetacharacters,
        Capability::NoDanglingMetacharacters,
        Capability::NestedCharacterClasses,
        Capability::OctalNoLeadingZero,
        Capability::OmitNumbersInQuantifiers,
        Capability::OmitBothNumbersInQuantifiers,
        Capability::CommentMode,
        Capability::WhitespaceInClass,
        Capability::AllowHexDigitClass,
        Capability::AllowEmptyCharacterClass,
        Capability::AllowHorizontalWhitespaceClass,
        Capability::UnicodeCategoryShorthand,
        Capability::PosixBracketExpressions,
        Capability::CaretNegatedProperties,
        Capability::PropertyValues,
        Capability::TransformationEscapes,
        Capability::MaxOctal177,
        Capability::MaxOctal377,
        Capability::MinOctal2Digits,
        Capability::MinOctal3Digits,
        Capability::ExtendedUnicodeCharacter,
        Capability::OneHexCharEscape,
        Capability::MysqlBracketExpressions,
        Capability::PcreBackReferences,
        Capability::PcreNumberedGroupRef,
        Capability::PcreConditions,
    ];

    /// The stable upper-case name of this capability.
    pub fn name(self) -> &'static str {
        match self {
            Capability::XmlSchemaMode => "XML_SCHEMA_MODE",
            Capability::DanglingMetacharacters => "DANGLING_METACHARACTERS",
            Capability::NoDanglingMetacharacters => "NO_DANGLING_METACHARACTERS",
            Capability::NestedCharacterClasses => "NESTED_CHARACTER_CLASSES",
            Capability::OctalNoLeadingZero => "OCTAL_NO_LEADING_ZERO",
            Capability::OmitNumbersInQuantifiers => "OMIT_NUMBERS_IN_QUANTIFIERS",
            Capability::OmitBothNumbersInQuantifiers => "OMIT_BOTH_NUMBERS_IN_QUANTIFIERS",
            Capability::CommentMode => "COMMENT_MODE",
            Capability::WhitespaceInClass => "WHITESPACE_IN_CLASS",
            Capability::AllowHexDigitClass => "ALLOW_HEX_DIGIT_CLASS",
            Capability::AllowEmptyCharacterClass => "ALLOW_EMPTY_CHARACTER_CLASS",
            Capability::AllowHorizontalWhitespaceClass => "ALLOW_HORIZONTAL_WHITESPACE_CLASS",
            Capability::UnicodeCategoryShorthand => "UNICODE_CATEGORY_SHORTHAND",
            Capability::PosixBracketExpressions => "POSIX_BRACKET_EXPRESSIONS",
            Capability::CaretNegatedProperties => "CARET_NEGATED_PROPERTIES",
            Capability::PropertyValues => "PROPERTY_VALUES",
            Capability::TransformationEscapes => "TRANSFORMATION_ESCAPES",
            Capability::MaxOctal177 => "MAX_OCTAL_177",
            Capability::MaxOctal377 => "MAX_OCTAL_377",
            Capability::MinOctal2Digits => "MIN_OCTAL_2_DIGITS",
            Capability::MinOctal3Digits => "MIN_OCTAL_3_DIGITS",
            Capability::ExtendedUnicodeCharacter => "EXTENDED_UNICODE_CHARACTER",
            Capability::OneHexCharEscape => "ONE_HEX_CHAR_ESCAPE",
            Capability::MysqlBracketExpressions => "MYSQL_BRACKET_EXPRESSIONS",
            Capability::PcreBackReferences => "PCRE_BACK_REFERENCES",
            Capability::PcreNumberedGroupRef => "PCRE_NUMBERED_GROUP_REF",
            Capability::PcreConditions => "PCRE_CONDITIONS",
        }
    }

    /// Look a capability up by its stable name. Case and `-`/`_` are ignored.
    pub fn from_name(name: &str) -> Option<Capability> {
        let normalized = name.trim().to_ascii_uppercase().replace('-', "_");
        NAME_TO_CAPABILITY_MAP.get(normalized.as_str()).copied()
    }

    const fn bit(self) -> u32 {
        1u32 << self as u8
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a capability name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCapability(pub String);

impl fmt::Display for UnknownCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown capability: {}", self.0)
    }
}

impl std::error::Error for UnknownCapability {}

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::from_name(s).ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

/// An immutable set of [`Capability`] flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    /// No capabilities at all.
    pub const EMPTY: CapabilitySet = CapabilitySet { bits: 0 };

    /// The set used when the caller has no dialect preference.
    pub const DEFAULT: CapabilitySet = CapabilitySet::from_slice(&[
        Capability::NestedCharacterClasses,
        Capability::AllowHorizontalWhitespaceClass,
        Capability::UnicodeCategoryShorthand,
        Capability::ExtendedUnicodeCharacter,
        Capability::PropertyValues,
    ]);

    /// Build a set from an explicit list of flags.
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        capabilities.into_iter().collect()
    }

    /// `const` counterpart of [`CapabilitySet::new`].
    pub const fn from_slice(capabilities: &[Capability]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < capabilities.len() {
            bits |= capabilities[i].bit();
            i += 1;
        }
        CapabilitySet { bits }
    }

    /// Test whether `capability` is in effect.
    ///
    /// [`Capability::NoDanglingMetacharacters`] masks
    /// [`Capability::DanglingMetacharacters`] when both are present.
    pub const fn contains(&self, capability: Capability) -> bool {
        if matches!(capability, Capability::DanglingMetacharacters)
            && self.bits & Capability::NoDanglingMetacharacters.bit() != 0
        {
            return false;
        }
        self.bits & capability.bit() != 0
    }

    /// Whether a counted quantifier may leave out its lower bound, as in
    /// `{,5}`. Allowing `{,}` implies allowing this too.
    pub const fn omits_quantifier_minimum(&self) -> bool {
        self.contains(Capability::OmitNumbersInQuantifiers)
            || self.contains(Capability::OmitBothNumbersInQuantifiers)
    }

    /// A copy of this set with `capability` added.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        CapabilitySet {
            bits: self.bits | capability.bit(),
        }
    }

    /// A copy of this set with `capability` removed.
    #[must_use]
    pub const fn without(self, capability: Capability) -> Self {
        CapabilitySet {
            bits: self.bits & !capability.bit(),
        }
    }

    /// The flags that were put into this set, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.bits & c.bit() != 0)
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        iter.into_iter().fold(CapabilitySet::EMPTY, |set, c| set.with(c))
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<T: IntoIterator<Item = Capability>>(&mut self, iter: T) {
        for c in iter {
            self.bits |= c.bit();
        }
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().map(Capability::name).join(", "))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
