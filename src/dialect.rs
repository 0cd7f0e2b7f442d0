//! Named regular expression flavours and their capability sets.

use std::fmt;
use std::str::FromStr;

use crate::capability::{Capability, CapabilitySet};

/// A regular expression flavour expressed as a fixed [`CapabilitySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Dialect {
    Java,
    Python,
    Ruby,
    Pcre,
    Posix,
    Mysql,
    XmlSchema,
}

impl Dialect {
    pub const ALL: [Dialect; 7] = [
        Dialect::Java,
        Dialect::Python,
        Dialect::Ruby,
        Dialect::Pcre,
        Dialect::Posix,
        Dialect::Mysql,
        Dialect::XmlSchema,
    ];

    /// The capabilities this dialect enables.
    pub const fn capabilities(self) -> CapabilitySet {
        use Capability::*;
        match self {
            Dialect::Java => CapabilitySet::from_slice(&[
                NestedCharacterClasses,
                AllowHorizontalWhitespaceClass,
                UnicodeCategoryShorthand,
                ExtendedUnicodeCharacter,
                PropertyValues,
                MaxOctal377,
            ]),
            Dialect::Python => CapabilitySet::from_slice(&[
                DanglingMetacharacters,
                OctalNoLeadingZero,
                OmitNumbersInQuantifiers,
                MaxOctal377,
            ]),
            Dialect::Ruby => CapabilitySet::from_slice(&[
                DanglingMetacharacters,
                NestedCharacterClasses,
                OctalNoLeadingZero,
                OmitNumbersInQuantifiers,
                AllowHexDigitClass,
                PosixBracketExpressions,
                CaretNegatedProperties,
                OneHexCharEscape,
                MaxOctal377,
            ]),
            Dialect::Pcre => CapabilitySet::from_slice(&[
                DanglingMetacharacters,
                OctalNoLeadingZero,
                AllowHorizontalWhitespaceClass,
                UnicodeCategoryShorthand,
                PosixBracketExpressions,
                CaretNegatedProperties,
                ExtendedUnicodeCharacter,
                OneHexCharEscape,
                MaxOctal377,
                PcreBackReferences,
                PcreNumberedGroupRef,
                PcreConditions,
            ]),
            Dialect::Posix => CapabilitySet::from_slice(&[
                DanglingMetacharacters,
                PosixBracketExpressions,
            ]),
            Dialect::Mysql => CapabilitySet::from_slice(&[
                DanglingMetacharacters,
                PosixBracketExpressions,
                MysqlBracketExpressions,
            ]),
            Dialect::XmlSchema => CapabilitySet::from_slice(&[
                XmlSchemaMode,
                NestedCharacterClasses,
                NoDanglingMetacharacters,
            ]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Java => "java",
            Dialect::Python => "python",
            Dialect::Ruby => "ruby",
            Dialect::Pcre => "pcre",
            Dialect::Posix => "posix",
            Dialect::Mysql => "mysql",
            Dialect::XmlSchema => "xml-schema",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown regular expression dialect: {}", self.0)
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Dialect::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_is_default_plus_octal_limit() {
        let java = Dialect::Java.capabilities();
        for c in CapabilitySet::DEFAULT.iter() {
            assert!(java.contains(c), "{c}");
        }
        assert!(java.contains(Capability::MaxOctal377));
    }

    #[test]
    fn only_pcre_has_pcre_references() {
        for d in Dialect::ALL {
            let expected = d == Dialect::Pcre;
            assert_eq!(
                d.capabilities().contains(Capability::PcreNumberedGroupRef),
                expected,
                "{d}"
            );
        }
    }

    #[test]
    fn xml_schema_masks_dangling_metacharacters() {
        let caps = Dialect::XmlSchema.capabilities();
        assert!(caps.contains(Capability::XmlSchemaMode));
        assert!(!caps.contains(Capability::DanglingMetacharacters));
    }

    #[test]
    fn parse_dialect_names() {
        assert_eq!("Ruby".parse::<Dialect>(), Ok(Dialect::Ruby));
        assert_eq!("xml_schema".parse::<Dialect>(), Ok(Dialect::XmlSchema));
        assert!("perl".parse::<Dialect>().is_err());
        for d in Dialect::ALL {
            assert_eq!(d.to_string().parse::<Dialect>(), Ok(d));
        }
    }
}
