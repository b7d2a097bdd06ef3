use regex::Captures;

use super::rule::{Branch, Rule, Slot, Tag};

/// Capture indexes of every slot inside one mailbox alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchGroups {
    pub branch: Branch,
    pub form: usize,
    pub personal: Vec<usize>,
    pub local_part: Vec<usize>,
    pub domain: Vec<usize>,
    pub trailing_cfws: Vec<usize>,
}

fn first<'t>(indexes: &[usize], caps: &Captures<'t>) -> Option<&'t str> {
    indexes
        .iter()
        .find_map(|&i| caps.get(i))
        .map(|m| m.as_str())
}

impl BranchGroups {
    pub fn personal<'t>(&self, caps: &Captures<'t>) -> Option<&'t str> {
        first(&self.personal, caps)
    }

    pub fn local_part<'t>(&self, caps: &Captures<'t>) -> Option<&'t str> {
        first(&self.local_part, caps)
    }

    pub fn domain<'t>(&self, caps: &Captures<'t>) -> Option<&'t str> {
        first(&self.domain, caps)
    }

    pub fn trailing_cfws<'t>(&self, caps: &Captures<'t>) -> Option<&'t str> {
        first(&self.trailing_cfws, caps)
    }
}

/// Maps mailbox captures to personal name, local part and domain.
///
/// Built once from the composed mailbox rule. The alternatives are listed in
/// the order they appear in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    branches: Vec<BranchGroups>,
}

impl FieldTable {
    pub(crate) fn from_rule(mailbox: &Rule) -> Self {
        let branches = mailbox
            .tags()
            .filter(|(_, tag)| tag.slot == Slot::Form)
            .filter_map(|(form, tag)| {
                let branch = tag.branch?;
                let of = |slot| mailbox.indexes_of(Tag::new(Some(branch), slot));
                Some(BranchGroups {
                    branch,
                    form,
                    personal: of(Slot::Personal),
                    local_part: of(Slot::LocalPart),
                    domain: of(Slot::Domain),
                    trailing_cfws: of(Slot::TrailingCfws),
                })
            })
            .collect();
        FieldTable { branches }
    }

    pub fn branches(&self) -> &[BranchGroups] {
        &self.branches
    }

    /// The alternative that took part in `caps`.
    pub fn matched(&self, caps: &Captures<'_>) -> Option<&BranchGroups> {
        self.branches.iter().find(|b| caps.get(b.form).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldTable;
    use crate::criteria::Criteria;
    use crate::grammar::rule::Branch;
    use crate::grammar::tokens::compose;
    use regex::Regex;

    #[test]
    fn branches_follow_alternation_order() {
        let table = FieldTable::from_rule(&compose(Criteria::RFC_COMPLIANT).mailbox);
        let branches: Vec<_> = table.branches().iter().map(|b| b.branch).collect();
        assert_eq!(branches, vec![Branch::NameAddr, Branch::AddrSpec]);

        let table = FieldTable::from_rule(&compose(Criteria::STRICT).mailbox);
        let branches: Vec<_> = table.branches().iter().map(|b| b.branch).collect();
        assert_eq!(branches, vec![Branch::AddrSpec]);
    }

    #[test]
    fn domain_literal_lands_in_domain() {
        let rules = compose(Criteria::RFC_COMPLIANT);
        let table = FieldTable::from_rule(&rules.mailbox);
        let re = Regex::new(&format!(r"\A(?:{})\z", rules.mailbox.source())).unwrap();

        let caps = re.captures("x@[1.0.0.127] (trailing)").unwrap();
        let groups = table.matched(&caps).unwrap();
        assert_eq!(groups.branch, Branch::AddrSpec);
        assert_eq!(groups.local_part(&caps), Some("x"));
        assert_eq!(groups.domain(&caps), Some("[1.0.0.127]"));
        assert_eq!(groups.trailing_cfws(&caps), Some(" (trailing)"));
        assert_eq!(groups.personal(&caps), None);

        let caps = re.captures("Bob <bob@[10.0.0.1]>").unwrap();
        let groups = table.matched(&caps).unwrap();
        assert_eq!(groups.branch, Branch::NameAddr);
        assert_eq!(groups.personal(&caps), Some("Bob "));
        assert_eq!(groups.domain(&caps), Some("[10.0.0.1]"));
    }
}
