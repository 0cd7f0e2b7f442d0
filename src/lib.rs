//! A lexer and error-tolerant concrete syntax tree parser for regular
//! expressions, configurable per dialect.
//!
//! Which constructs are recognised is controlled by a [`CapabilitySet`],
//! either built by hand or taken from a [`Dialect`] preset. Parsing never
//! fails: malformed input still yields a complete tree covering every
//! character, plus a list of [`Diagnostic`]s.
//!
//! # Example
//!
//! ```rust
//! use regexp_lang::{CapabilitySet, NodeKind, parse};
//!
//! let result = parse("a(b|c)*", CapabilitySet::DEFAULT);
//! assert!(!result.has_errors());
//! assert_eq!(result.capturing_group_count(), 1);
//!
//! let closure = result
//!     .tree()
//!     .root()
//!     .descendants()
//!     .find(|node| node.kind() == NodeKind::Closure);
//! assert_eq!(closure.map(|node| node.text()), Some("(b|c)*"));
//!
//! let broken = parse("(abc", CapabilitySet::DEFAULT);
//! assert_eq!(broken.diagnostics()[0].to_string(), "4..4: Unclosed group");
//! assert_eq!(broken.tree().root().text(), "(abc");
//! ```

pub mod ast;
pub mod builder;
pub mod capability;
pub mod diagnostic;
pub mod dialect;
pub mod lexer;
pub mod parser;
pub mod syntax;
pub mod token;
pub mod tree;
pub mod unicode;

pub use capability::{Capability, CapabilitySet, UnknownCapability};
pub use diagnostic::Diagnostic;
pub use dialect::{Dialect, UnknownDialect};
pub use lexer::{Lexer, tokenize};
pub use parser::{MAX_NESTING_DEPTH, Parse, parse};
pub use syntax::{NodeKind, SyntaxNode, SyntaxToken, SyntaxTree};
pub use token::{Token, TokenKind};
