//! Turning a mailbox match into personal name, local part and domain.

use log::warn;
use regex::{Captures, NoExpand};

use crate::grammar::Grammar;

/// The parts of one mailbox.
///
/// Local part and domain always come together; the personal name is
/// independent of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchFields {
    pub personal: Option<String>,
    pub local_part: String,
    pub domain: String,
}

impl MatchFields {
    pub fn new(personal: Option<&str>, local_part: &str, domain: &str) -> Self {
        MatchFields {
            personal: personal.map(str::to_owned),
            local_part: local_part.to_owned(),
            domain: domain.to_owned(),
        }
    }

    pub fn personal(&self) -> Option<&str> {
        self.personal.as_deref()
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `local_part@domain`
    pub fn address(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

/// Extracts the parts of a whole-text mailbox match.
pub fn extract(grammar: &Grammar, text: &str, comment_as_personal: bool) -> Option<MatchFields> {
    let caps = grammar.mailbox.captures(text)?;
    fields_from_captures(grammar, &caps, comment_as_personal)
}

pub(crate) fn fields_from_captures(
    grammar: &Grammar,
    caps: &Captures<'_>,
    comment_as_personal: bool,
) -> Option<MatchFields> {
    let groups = match grammar.fields().matched(caps) {
        Some(groups) => groups,
        None => {
            warn!(
                "Mailbox matched {:?} under {} but no alternative took part",
                &caps[0],
                grammar.criteria()
            );
            return None;
        }
    };

    let local_part = groups.local_part(caps).map(str::trim);
    let domain = groups.domain(caps).map(str::trim);

    let mut personal = groups.personal(caps).map(str::to_owned);
    if personal.is_none() && comment_as_personal {
        personal = groups
            .trailing_cfws(caps)
            .and_then(|cfws| first_comment(grammar, cfws))
            .map(|comment| strip_bounding('(', ')', comment).to_owned());
    }
    let personal = personal.map(|p| cleanup_personal(grammar, &p));

    let (local_part, domain) = match (local_part, domain) {
        (Some(local_part), Some(domain)) => (local_part, domain),
        (local_part, domain) => {
            warn!(
                "Mailbox {:?} matched as {:?} without both parts (local part {:?}, domain {:?})",
                &caps[0], groups.branch, local_part, domain
            );
            return None;
        }
    };

    Some(MatchFields {
        personal,
        local_part: unquote_local_part(grammar, local_part, domain),
        domain: domain.to_owned(),
    })
}

/// Drops the quotes around a local part when the address stays valid without
/// them.
fn unquote_local_part(grammar: &Grammar, local_part: &str, domain: &str) -> String {
    let unquoted = strip_bounding('"', '"', local_part);
    if unquoted.len() != local_part.len()
        && grammar
            .addr_spec
            .is_match(&format!("{}@{}", unquoted, domain))
    {
        unquoted.to_owned()
    } else {
        local_part.to_owned()
    }
}

/// The first comment inside `text`, parentheses included.
pub fn first_comment<'t>(grammar: &Grammar, text: &'t str) -> Option<&'t str> {
    grammar.comment.find(text).map(|m| m.as_str().trim())
}

/// Trims a personal name and, if it is exactly one quoted string, removes the
/// quotes and resolves `\\` and `\"`.
pub fn cleanup_personal(grammar: &Grammar, text: &str) -> String {
    let trimmed = text.trim();
    if !grammar.quoted_string.is_match(trimmed) {
        return trimmed.to_owned();
    }
    let inner = strip_bounding('"', '"', trimmed);
    let inner = grammar.escaped_backslash.replace_all(inner, NoExpand(r"\"));
    let inner = grammar.escaped_quote.replace_all(&inner, NoExpand("\""));
    inner.trim().to_owned()
}

/// `text` without its first and last characters if they are `open` and
/// `close`; otherwise `text` unchanged.
pub fn strip_bounding(open: char, close: char, text: &str) -> &str {
    text.strip_prefix(open)
        .and_then(|t| t.strip_suffix(close))
        .unwrap_or(text)
}

#[test]
fn strip_bounding_needs_both_ends() {
    assert_eq!(strip_bounding('(', ')', "(Bob)"), "Bob");
    assert_eq!(strip_bounding('(', ')', "(Bob"), "(Bob");
    assert_eq!(strip_bounding('"', '"', "\""), "\"");
    assert_eq!(strip_bounding('"', '"', "\"\""), "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Criteria, Criterion};
    use pretty_assertions::assert_eq;

    fn parts(criteria: Criteria, text: &str, comment_as_personal: bool) -> Option<MatchFields> {
        extract(&Grammar::compile(criteria), text, comment_as_personal)
    }

    #[test]
    fn bare_address() {
        assert_eq!(
            parts(Criteria::DEFAULT, "me@example.com", false),
            Some(MatchFields::new(None, "me", "example.com"))
        );
        assert_eq!(parts(Criteria::DEFAULT, "NotAnEmail", false), None);
    }

    #[test]
    fn quoted_personal_name() {
        let fields = parts(Criteria::DEFAULT, r#""Bob" <bob@hi.com>"#, false).unwrap();
        assert_eq!(fields.personal(), Some("Bob"));
        assert_eq!(fields.address(), "bob@hi.com");

        let fields = parts(
            Criteria::DEFAULT,
            r#""Bob \"the builder\" \\ Smith" <bob@hi.com>"#,
            false,
        )
        .unwrap();
        assert_eq!(fields.personal(), Some(r#"Bob "the builder" \ Smith"#));
    }

    #[test]
    fn unquoted_personal_name_is_trimmed() {
        assert_eq!(
            parts(Criteria::DEFAULT, "test Mail <noreply@testmail.com>", false),
            Some(MatchFields::new(Some("test Mail"), "noreply", "testmail.com"))
        );
    }

    #[test]
    fn domain_literal() {
        assert_eq!(
            parts(Criteria::DEFAULT, "x@[1.0.0.127]", false),
            Some(MatchFields::new(None, "x", "[1.0.0.127]"))
        );
        assert_eq!(
            parts(Criteria::DEFAULT, "Bob <x@[1.0.0.127]> (home)", true),
            Some(MatchFields::new(Some("Bob"), "x", "[1.0.0.127]"))
        );
    }

    #[test]
    fn comment_as_personal_takes_first_comment() {
        let text = "bob@example.com (Bob) (Smith)";
        assert_eq!(
            parts(Criteria::DEFAULT, text, true),
            Some(MatchFields::new(Some("Bob"), "bob", "example.com"))
        );
        assert_eq!(
            parts(Criteria::DEFAULT, text, false),
            Some(MatchFields::new(None, "bob", "example.com"))
        );
        assert_eq!(
            parts(Criteria::DEFAULT, "<bob@example.com> (Bob Smith)", true),
            Some(MatchFields::new(Some("Bob Smith"), "bob", "example.com"))
        );
    }

    #[test]
    fn quotes_stripped_only_when_safe() {
        assert_eq!(
            parts(Criteria::DEFAULT, r#""bob"@example.com"#, false).unwrap().local_part(),
            "bob"
        );
        assert_eq!(
            parts(Criteria::DEFAULT, r#""bob smith"@example.com"#, false)
                .unwrap()
                .local_part(),
            r#""bob smith""#
        );
        assert_eq!(
            parts(Criteria::DEFAULT, r#""bob(hi)smith"@test.com"#, false)
                .unwrap()
                .local_part(),
            r#""bob(hi)smith""#
        );
        assert_eq!(
            parts(
                Criteria::DEFAULT.without(Criterion::AllowParensInLocalPart),
                r#""bob(hi)smith"@test.com"#,
                false
            ),
            None
        );
    }

    #[test]
    fn comments_around_local_part_are_trimmed_away() {
        let fields = parts(Criteria::DEFAULT, "me(this is a comment)@example.com", false).unwrap();
        assert_eq!(fields.local_part(), "me");
        assert_eq!(fields.domain(), "example.com");
    }

    #[test]
    fn cleanup() {
        let g = Grammar::compile(Criteria::DEFAULT);
        assert_eq!(cleanup_personal(&g, r#"  "  Bob  "  "#), "Bob");
        assert_eq!(cleanup_personal(&g, r#""Bob" Smith"#), r#""Bob" Smith"#);
        assert_eq!(cleanup_personal(&g, r#""""#), "");
        assert_eq!(first_comment(&g, "  (a) (b) "), Some("(a)"));
        assert_eq!(first_comment(&g, "no comment"), None);
    }

    #[test]
    fn round_trip_through_addr_spec() {
        let g = Grammar::compile(Criteria::ALL);
        for text in &[
            "me@example.com",
            r#""Bob" <bob@hi.com>"#,
            "x@[1.0.0.127]",
            r#""bob smith"@example.com"#,
            "Kayaks.org <kayaks@kayaks.org>",
            "me (comment) @ example.com",
        ] {
            let fields = extract(&g, text, false).unwrap();
            assert!(
                crate::validate::is_valid_addr_spec(&g, &fields.address()),
                "{:?}",
                fields
            );
        }
    }
}
