//! Composition of the RFC 2822 address grammar into compiled matchers.
//!
//! Matching uses the `regex` crate's automata, so every matcher runs in time
//! linear in its input no matter how the grammar nests its repetitions.

mod cache;
mod fields;
mod rule;
mod tokens;

pub use cache::GrammarCache;
pub use fields::{BranchGroups, FieldTable};
pub use rule::{Branch, Slot};

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::criteria::Criteria;
use rule::Tag;

const SIZE_LIMIT: usize = 32 * (1 << 20);

/// Names of the composed tokens whose pattern source can be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Mailbox,
    AddrSpec,
    MailboxList,
    Address,
    GroupPrefix,
    ReturnPath,
    Comment,
    QuotedString,
}

#[derive(Debug)]
pub struct Grammar {
    criteria: Criteria,
    pub(crate) mailbox: Regex,
    pub(crate) mailbox_prefix: Regex,
    pub(crate) addr_spec: Regex,
    pub(crate) mailbox_list: Regex,
    pub(crate) address_prefix: Regex,
    pub(crate) group_prefix: Regex,
    pub(crate) comment: Regex,
    pub(crate) quoted_string: Regex,
    pub(crate) return_path: Regex,
    pub(crate) return_path_contents: usize,
    pub(crate) escaped_quote: Regex,
    pub(crate) escaped_backslash: Regex,
    pub(crate) fields: FieldTable,
}

fn matcher(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .size_limit(SIZE_LIMIT)
        .build()
        .expect("the address grammar is fixed and always compiles")
}

fn whole(src: &str) -> Regex {
    matcher(&format!(r"\A(?:{})\z", src))
}

fn prefix(src: &str) -> Regex {
    matcher(&format!(r"\A(?:{})", src))
}

impl Grammar {
    pub fn compile(criteria: Criteria) -> Grammar {
        let rules = tokens::compose(criteria);
        let return_path_contents = rules
            .return_path
            .indexes_of(Tag::new(None, Slot::BracketContents))
            .first()
            .copied()
            .unwrap_or_default();
        let grammar = Grammar {
            criteria,
            mailbox: whole(rules.mailbox.source()),
            mailbox_prefix: prefix(rules.mailbox.source()),
            addr_spec: whole(rules.addr_spec.source()),
            mailbox_list: whole(rules.mailbox_list.source()),
            address_prefix: prefix(rules.address.source()),
            group_prefix: prefix(rules.group_prefix.source()),
            comment: matcher(rules.comment.source()),
            quoted_string: whole(rules.quoted_string.source()),
            return_path: whole(rules.return_path.source()),
            return_path_contents,
            escaped_quote: matcher(r#"\\""#),
            escaped_backslash: matcher(r"\\\\"),
            fields: FieldTable::from_rule(&rules.mailbox),
        };
        debug!(
            "Compiled address grammar for {} ({} mailbox groups, {} bytes of pattern)",
            criteria,
            rules.mailbox.group_count(),
            rules.mailbox.source().len()
        );
        grammar
    }

    pub fn criteria(&self) -> Criteria {
        self.criteria
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// The compiled pattern for `token`, anchors included.
    pub fn pattern(&self, token: Token) -> &str {
        match token {
            Token::Mailbox => self.mailbox.as_str(),
            Token::AddrSpec => self.addr_spec.as_str(),
            Token::MailboxList => self.mailbox_list.as_str(),
            Token::Address => self.address_prefix.as_str(),
            Token::GroupPrefix => self.group_prefix.as_str(),
            Token::ReturnPath => self.return_path.as_str(),
            Token::Comment => self.comment.as_str(),
            Token::QuotedString => self.quoted_string.as_str(),
        }
    }
}
