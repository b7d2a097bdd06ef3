//! Yes/no syntax checks against a compiled grammar.

use crate::grammar::Grammar;

/// A single mailbox: a bare addr-spec, or `phrase <addr-spec>` when quoted
/// identifiers are allowed.
pub fn is_valid(grammar: &Grammar, text: &str) -> bool {
    grammar.mailbox.is_match(text)
}

/// A bare `local-part@domain`, without any display name or brackets.
pub fn is_valid_addr_spec(grammar: &Grammar, text: &str) -> bool {
    grammar.addr_spec.is_match(text)
}

pub fn is_valid_mailbox_list(grammar: &Grammar, text: &str) -> bool {
    grammar.mailbox_list.is_match(text)
}

/// Comma-separated addresses, each a mailbox or a group.
///
/// Walks the text left to right and never reconsiders where an earlier
/// address ended.
pub fn is_valid_address_list(grammar: &Grammar, text: &str) -> bool {
    let mut pos = 0;
    loop {
        let end = match grammar.address_prefix.find(&text[pos..]) {
            Some(m) => pos + m.end(),
            None => return false,
        };
        if end == text.len() {
            return true;
        }
        if text.as_bytes()[end] != b',' {
            return false;
        }
        pos = end + 1;
    }
}

pub fn is_valid_return_path(grammar: &Grammar, text: &str) -> bool {
    grammar.return_path.is_match(text)
}

/// What sits between the angle brackets of a valid return path.
pub fn return_path_contents<'t>(grammar: &Grammar, text: &'t str) -> Option<&'t str> {
    grammar
        .return_path
        .captures(text)
        .and_then(|caps| caps.get(grammar.return_path_contents))
        .map(|m| m.as_str())
}
