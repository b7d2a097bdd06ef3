//! Regex source builders that remember what each capturing group means.
//!
//! Every `Rule` carries its pattern source together with one entry per
//! capturing group it opens, in opening order. Composing rules concatenates
//! both, so the final pattern knows the 1-based index of every tagged group
//! without any counting by hand.

use itertools::Itertools;

/// The semantic role of a capturing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The whole alternative of the mailbox that matched.
    Form,
    Personal,
    LocalPart,
    Domain,
    TrailingCfws,
    BracketContents,
}

/// Which alternative of the mailbox a group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    NameAddr,
    AddrSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub branch: Option<Branch>,
    pub slot: Slot,
}

impl Tag {
    pub const fn new(branch: Option<Branch>, slot: Slot) -> Self {
        Tag { branch, slot }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    src: String,
    groups: Vec<Option<Tag>>,
}

impl Rule {
    pub fn source(&self) -> &str {
        &self.src
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 1-based capture indexes of every group carrying `tag`, in order.
    pub fn indexes_of(&self, tag: Tag) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Some(tag))
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn tags(&self) -> impl Iterator<Item = (usize, Tag)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i + 1, t)))
    }

    /// Scope every tag that has no branch yet to `branch`.
    pub fn within(mut self, branch: Branch) -> Self {
        for tag in self.groups.iter_mut().flatten() {
            if tag.branch.is_none() {
                tag.branch = Some(branch);
            }
        }
        self
    }

    fn wrapped(&self, suffix: &str) -> Rule {
        Rule {
            src: format!("(?:{}){}", self.src, suffix),
            groups: self.groups.clone(),
        }
    }
}

/// Pattern text taken as is. Only for atomic pieces such as `\r\n`.
pub fn raw(src: &str) -> Rule {
    Rule {
        src: src.to_owned(),
        groups: Vec::new(),
    }
}

pub fn lit(text: &str) -> Rule {
    raw(&regex_syntax::escape(text))
}

/// A character class built from already-escaped ranges.
pub fn class(ranges: &[&str]) -> Rule {
    raw(&format!("[{}]", ranges.concat()))
}

pub fn seq(rules: &[&Rule]) -> Rule {
    Rule {
        src: rules.iter().map(|r| r.src.as_str()).collect(),
        groups: rules.iter().flat_map(|r| r.groups.iter().copied()).collect(),
    }
}

pub fn alt(rules: &[&Rule]) -> Rule {
    Rule {
        src: format!("(?:{})", rules.iter().map(|r| r.src.as_str()).join("|")),
        groups: rules.iter().flat_map(|r| r.groups.iter().copied()).collect(),
    }
}

pub fn opt(rule: &Rule) -> Rule {
    rule.wrapped("?")
}

pub fn lazy_opt(rule: &Rule) -> Rule {
    rule.wrapped("??")
}

pub fn many0(rule: &Rule) -> Rule {
    rule.wrapped("*")
}

pub fn many1(rule: &Rule) -> Rule {
    rule.wrapped("+")
}

pub fn repeat(rule: &Rule, min: u32, max: u32) -> Rule {
    rule.wrapped(&format!("{{{},{}}}", min, max))
}

/// A capturing group tagged with `slot`.
pub fn slot(slot: Slot, rule: &Rule) -> Rule {
    let mut groups = Vec::with_capacity(rule.groups.len() + 1);
    groups.push(Some(Tag::new(None, slot)));
    groups.extend(rule.groups.iter().copied());
    Rule {
        src: format!("({})", rule.src),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn literal_is_escaped() {
        assert_eq!(lit("a.b").source(), r"a\.b");
        assert_eq!(lit("<").source(), "<");
    }

    #[test]
    fn composition_keeps_group_order() {
        let word = slot(Slot::LocalPart, &many1(&class(&["a-z"])));
        let host = slot(Slot::Domain, &many1(&class(&["a-z"])));
        let rule = alt(&[
            &slot(Slot::Form, &seq(&[&word, &lit("@"), &host])).within(Branch::AddrSpec),
            &slot(Slot::Form, &word).within(Branch::NameAddr),
        ]);
        assert_eq!(rule.group_count(), 5);
        assert_eq!(
            rule.indexes_of(Tag::new(Some(Branch::AddrSpec), Slot::LocalPart)),
            vec![2]
        );
        assert_eq!(
            rule.indexes_of(Tag::new(Some(Branch::AddrSpec), Slot::Domain)),
            vec![3]
        );
        assert_eq!(
            rule.indexes_of(Tag::new(Some(Branch::NameAddr), Slot::LocalPart)),
            vec![5]
        );

        let re = Regex::new(&format!(r"\A{}\z", rule.source())).unwrap();
        assert_eq!(re.captures_len(), rule.group_count() + 1);
        let caps = re.captures("me@example").unwrap();
        assert_eq!(&caps[2], "me");
        assert_eq!(&caps[3], "example");
        assert!(caps.get(5).is_none());
    }

    #[test]
    fn within_keeps_existing_branch() {
        let inner = slot(Slot::Personal, &lit("x")).within(Branch::NameAddr);
        let outer = slot(Slot::Form, &inner).within(Branch::AddrSpec);
        assert_eq!(
            outer.tags().collect::<Vec<_>>(),
            vec![
                (1, Tag::new(Some(Branch::AddrSpec), Slot::Form)),
                (2, Tag::new(Some(Branch::NameAddr), Slot::Personal)),
            ]
        );
    }

    #[test]
    fn quantifiers_apply_to_whole_rule() {
        let re = Regex::new(&format!(
            r"\A{}\z",
            seq(&[&repeat(&lit("ab"), 1, 2), &opt(&lit("c"))]).source()
        ))
        .unwrap();
        assert!(re.is_match("abab"));
        assert!(re.is_match("abc"));
        assert!(!re.is_match("aba"));
        assert!(!re.is_match("ababab"));
    }
}
