//! Backslash escapes.

use super::{Lexer, State};
use crate::capability::Capability;
use crate::token::TokenKind;

/// Number of leading ASCII hex digits in `s`, at most `max`.
fn hex_digits(s: &str, max: usize) -> usize {
    s.bytes().take(max).take_while(u8::is_ascii_hexdigit).count()
}

/// Length of an optionally signed decimal number at the start of `s`, or 0
/// when there are no digits.
fn signed_number(s: &str) -> usize {
    let sign = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 { 0 } else { sign + digits }
}

impl Lexer<'_> {
    /// Lex the escape sequence at the current position, which starts with
    /// a backslash.
    pub(super) fn lex_escape(&mut self, in_class: bool) -> (TokenKind, usize) {
        use TokenKind::*;
        let rest = self.rest();
        let Some(c) = rest[1..].chars().next() else {
            return (BadCharacter, 1);
        };
        let after = &rest[1 + c.len_utf8()..];
        match c {
            'Q' => {
                self.states.push(State::Quote);
                (QuoteBegin, 2)
            }
            'E' => (QuoteEnd, 2),
            't' | 'n' | 'r' | 'f' | 'a' | 'e' => (EscCtrlCharacter, 2),
            'v' if self.has(Capability::AllowHorizontalWhitespaceClass) => (CharClass, 2),
            'v' => (EscCtrlCharacter, 2),
            'V' if self.has(Capability::AllowHorizontalWhitespaceClass) => (CharClass, 2),
            'h' | 'H'
                if self.has(Capability::AllowHorizontalWhitespaceClass)
                    || self.has(Capability::AllowHexDigitClass) =>
            {
                (CharClass, 2)
            }
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => (CharClass, 2),
            'i' | 'I' | 'c' | 'C' if self.has(Capability::XmlSchemaMode) => (CharClass, 2),
            'c' => match after.chars().next() {
                Some(ctrl) => (CtrlCharacter, 2 + ctrl.len_utf8()),
                None => (BadCharacter, 2),
            },
            'x' => self.lex_hex(after),
            'u' => self.lex_unicode(after),
            'l' | 'L' | 'U' if self.has(Capability::TransformationEscapes) => (EscCharacter, 2),
            '0'..='9' => self.lex_numeric(&rest[1..], in_class),
            'p' | 'P' => {
                self.states.push(State::Property);
                (Property, 2)
            }
            'N' if after.starts_with('{') => {
                self.states.push(State::NamedChar);
                (NamedCharacter, 2)
            }
            'N' => (CharClass, 2),
            'R' | 'X' if !in_class => (CharClass, 2),
            'b' if in_class => (EscCtrlCharacter, 2),
            'b' | 'B' | 'A' | 'z' | 'Z' | 'G' if !in_class => (Boundary, 2),
            'k' if !in_class => self.lex_named_reference(after),
            'g' if !in_class => self.lex_g_reference(after),
            c if c.is_ascii_alphanumeric() => (BadCharacter, 2),
            c if self.needs_escape(c, in_class) => (EscCharacter, 1 + c.len_utf8()),
            c => (RedundantEscape, 1 + c.len_utf8()),
        }
    }

    /// Whether `c` would mean something other than itself without the
    /// backslash.
    fn needs_escape(&self, c: char, in_class: bool) -> bool {
        let structural = if in_class {
            matches!(c, '\\' | '[' | ']' | '^' | '-' | '&')
        } else {
            matches!(
                c,
                '\\' | '.' | '[' | ']' | '(' | ')' | '{' | '}' | '|' | '*' | '+' | '?' | '^' | '$'
            )
        };
        let trivia = self.comments && (!in_class || self.has(Capability::WhitespaceInClass));
        structural || (trivia && (c == '#' || c.is_whitespace()))
    }

    fn lex_hex(&self, after: &str) -> (TokenKind, usize) {
        if let Some(body) = after.strip_prefix('{') {
            return self.lex_braced_hex(body, TokenKind::HexChar);
        }
        match hex_digits(after, 2) {
            2 => (TokenKind::HexChar, 4),
            1 if self.has(Capability::OneHexCharEscape) => (TokenKind::HexChar, 3),
            n => (TokenKind::BadHexValue, 2 + n),
        }
    }

    /// `\x{...}` or `\u{...}`; `body` follows the opening brace.
    fn lex_braced_hex(&self, body: &str, kind: TokenKind) -> (TokenKind, usize) {
        let digits = hex_digits(body, usize::MAX);
        let closed = body[digits..].starts_with('}');
        let len = 3 + digits + usize::from(closed);
        if closed && digits > 0 && self.has(Capability::ExtendedUnicodeCharacter) {
            (kind, len)
        } else {
            (TokenKind::BadHexValue, len)
        }
    }

    fn lex_unicode(&self, after: &str) -> (TokenKind, usize) {
        let digits = hex_digits(after, 4);
        if digits == 4 {
            return (TokenKind::UnicodeChar, 6);
        }
        if self.has(Capability::ExtendedUnicodeCharacter)
            && let Some(body) = after.strip_prefix('{')
        {
            return self.lex_braced_hex(body, TokenKind::UnicodeChar);
        }
        if digits == 0 && self.has(Capability::TransformationEscapes) {
            (TokenKind::EscCharacter, 2)
        } else {
            (TokenKind::BadHexValue, 2 + digits)
        }
    }

    fn max_octal(&self) -> u32 {
        if self.has(Capability::MaxOctal177) {
            0o177
        } else if self.has(Capability::MaxOctal377) {
            0o377
        } else {
            0o777
        }
    }

    fn min_octal_digits(&self) -> usize {
        if self.has(Capability::MinOctal3Digits) {
            3
        } else if self.has(Capability::MinOctal2Digits) {
            2
        } else {
            1
        }
    }

    /// Leading octal digits of `s`, at most three, taken while the value
    /// stays within the dialect maximum.
    fn octal_digits(&self, s: &str) -> usize {
        let max = self.max_octal();
        let mut value = 0;
        let mut count = 0;
        for b in s.bytes().take(3) {
            if !(b'0'..=b'7').contains(&b) {
                break;
            }
            let next = value * 8 + u32::from(b - b'0');
            if next > max {
                break;
            }
            value = next;
            count += 1;
        }
        count
    }

    /// `\` followed by a digit: an octal escape or a back reference.
    /// `digits` starts at the first digit. Classes cannot hold back
    /// references.
    fn lex_numeric(&self, digits: &str, in_class: bool) -> (TokenKind, usize) {
        let leading_zero = digits.starts_with('0');
        if self.has(Capability::OctalNoLeadingZero) {
            let n = self.octal_digits(digits);
            if leading_zero {
                let kind = if n >= self.min_octal_digits() {
                    TokenKind::OctChar
                } else {
                    TokenKind::BadOctValue
                };
                return (kind, 1 + n);
            }
            if n == 3 {
                return (TokenKind::OctChar, 4);
            }
        } else if leading_zero {
            let n = self.octal_digits(&digits[1..]);
            let kind = if n > 0 && n >= self.min_octal_digits() {
                TokenKind::OctChar
            } else {
                TokenKind::BadOctValue
            };
            return (kind, 2 + n);
        }
        let kind = if in_class {
            TokenKind::BadCharacter
        } else {
            TokenKind::Backref
        };
        (kind, 1 + self.backref_digits(digits))
    }

    /// Digits of a numeric back reference: the first digit always, then more
    /// while the number still names a group seen so far.
    fn backref_digits(&self, digits: &str) -> usize {
        let bytes = digits.as_bytes();
        let mut value = usize::from(bytes[0] - b'0');
        let mut count = 1;
        for &b in &bytes[1..] {
            if !b.is_ascii_digit() {
                break;
            }
            let next = value * 10 + usize::from(b - b'0');
            if next > self.capturing_groups {
                break;
            }
            value = next;
            count += 1;
        }
        count
    }

    /// `\k<name>`, `\k'name'` or `\k{name}`.
    fn lex_named_reference(&mut self, after: &str) -> (TokenKind, usize) {
        let kind = match after.chars().next() {
            Some('<') => TokenKind::RubyNamedGroupRef,
            Some('\'') => TokenKind::RubyQuotedNamedGroupRef,
            Some('{') => TokenKind::BraceNamedGroupRef,
            _ => return (TokenKind::BadCharacter, 2),
        };
        self.states.push(State::GroupName);
        (kind, 3)
    }

    /// `\g` calls and references: `\g<name>`, `\g'name'`, `\g{name}`,
    /// `\g{-1}`, `\g1`.
    fn lex_g_reference(&mut self, after: &str) -> (TokenKind, usize) {
        match after.chars().next() {
            Some('<') => {
                self.states.push(State::GroupName);
                (TokenKind::RubyNamedGroupCall, 3)
            }
            Some('\'') => {
                self.states.push(State::GroupName);
                (TokenKind::RubyQuotedNamedGroupCall, 3)
            }
            Some('{') => {
                let body = &after[1..];
                let n = signed_number(body);
                if n > 0 && body[n..].starts_with('}') {
                    (TokenKind::Backref, 3 + n + 1)
                } else {
                    self.states.push(State::GroupName);
                    (TokenKind::BraceNamedGroupRef, 3)
                }
            }
            _ => match signed_number(after) {
                0 => (TokenKind::BadCharacter, 2),
                n => (TokenKind::Backref, 2 + n),
            },
        }
    }
}
