//! Validation and extraction of RFC 2822 email addresses.
//!
//! The address grammar is assembled per [`Criteria`] (a set of relaxations of
//! the RFC) and compiled once into linear-time matchers. A [`Context`] owns
//! the compiled grammars and exposes every check:
//!
//! ```
//! use rfc2822_address::{Context, Criteria};
//!
//! let ctx = Context::new();
//! assert!(ctx.is_valid(r#""Bob" <bob@example.com>"#, Criteria::DEFAULT));
//! assert!(!ctx.is_valid(r#""Bob" <bob@example.com>"#, Criteria::STRICT));
//!
//! let all = ctx.extract_all_from_header("team: a@b.com, c@d.com;", Criteria::DEFAULT, false);
//! assert_eq!(all.len(), 2);
//! ```

pub mod address;
pub mod config;
pub mod context;
pub mod criteria;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod scan;
pub mod validate;

pub use address::Address;
pub use config::Config;
pub use context::Context;
pub use criteria::{Criteria, Criterion};
pub use error::EncodingError;
pub use extract::MatchFields;
pub use grammar::{Grammar, GrammarCache, Token};
pub use scan::{ListScanner, ScanStateKind};

/// Whether `text` is a single valid mailbox under [`Criteria::DEFAULT`].
pub fn is_valid(text: &str) -> bool {
    Context::shared().is_valid(text, Criteria::DEFAULT)
}

/// Personal name, local part and domain of a single mailbox under
/// [`Criteria::DEFAULT`].
pub fn extract_parts(text: &str) -> Option<MatchFields> {
    Context::shared().extract_parts(text, Criteria::DEFAULT, false)
}

/// Every mailbox of a header value under [`Criteria::DEFAULT`], groups
/// flattened.
pub fn extract_all_from_header(text: &str) -> Vec<MatchFields> {
    Context::shared().extract_all_from_header(text, Criteria::DEFAULT, false)
}
