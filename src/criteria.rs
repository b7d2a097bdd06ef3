use std::fmt::{Debug, Display};
use std::iter::FromIterator;
use std::ops::BitOr;

use itertools::Itertools;

/// A single relaxation of the RFC 2822 address grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Criterion {
    /// Accept `"Name" <addr>` and `Name <addr>`, not just a bare addr-spec.
    AllowQuotedIdentifiers,
    /// Accept `[...]` domain literals. The domain becomes an RFC 2822
    /// dot-atom instead of a strict RFC 1035 host name.
    AllowDomainLiterals,
    /// Accept `.` inside atoms, e.g. `Kayaks.org <kayaks@kayaks.org>`.
    AllowDotInAText,
    /// Accept `[` and `]` inside atoms, e.g. `[Kayaks] <kayaks@kayaks.org>`.
    AllowSquareBracketsInAText,
    /// Accept `(` and `)` inside a quoted local part.
    AllowParensInLocalPart,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::AllowQuotedIdentifiers,
        Criterion::AllowDomainLiterals,
        Criterion::AllowDotInAText,
        Criterion::AllowSquareBracketsInAText,
        Criterion::AllowParensInLocalPart,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Criterion::AllowQuotedIdentifiers => "ALLOW_QUOTED_IDENTIFIERS",
            Criterion::AllowDomainLiterals => "ALLOW_DOMAIN_LITERALS",
            Criterion::AllowDotInAText => "ALLOW_DOT_IN_A_TEXT",
            Criterion::AllowSquareBracketsInAText => "ALLOW_SQUARE_BRACKETS_IN_A_TEXT",
            Criterion::AllowParensInLocalPart => "ALLOW_PARENS_IN_LOCALPART",
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable set of [`Criterion`] flags.
///
/// Two sets holding the same flags compare and hash equal no matter how they
/// were built, so a `Criteria` can key the grammar cache directly.
///
/// Presets:
///
/// * [`Criteria::STRICT`]: nothing relaxed. Bare addr-spec with an RFC 1035
///   host name.
/// * [`Criteria::RFC_COMPLIANT`]: quoted identifiers, domain literals and
///   parentheses in quoted local parts, i.e. what RFC 2822 itself permits.
/// * [`Criteria::RECOMMENDED`]: same members as `RFC_COMPLIANT`.
/// * [`Criteria::DEFAULT`]: `RFC_COMPLIANT`; also what `Criteria::default()`
///   returns.
/// * [`Criteria::ALL`]: every flag, including the two atom relaxations that
///   go beyond the RFC.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Criteria(u8);

impl Criteria {
    pub const STRICT: Criteria = Criteria(0);
    pub const RFC_COMPLIANT: Criteria = Criteria::STRICT
        .with(Criterion::AllowQuotedIdentifiers)
        .with(Criterion::AllowDomainLiterals)
        .with(Criterion::AllowParensInLocalPart);
    pub const RECOMMENDED: Criteria = Criteria::RFC_COMPLIANT;
    pub const DEFAULT: Criteria = Criteria::RFC_COMPLIANT;
    pub const ALL: Criteria = Criteria::RFC_COMPLIANT
        .with(Criterion::AllowDotInAText)
        .with(Criterion::AllowSquareBracketsInAText);

    pub const fn with(self, criterion: Criterion) -> Self {
        Criteria(self.0 | criterion.bit())
    }

    pub const fn without(self, criterion: Criterion) -> Self {
        Criteria(self.0 & !criterion.bit())
    }

    pub const fn union(self, other: Criteria) -> Self {
        Criteria(self.0 | other.0)
    }

    pub const fn contains(self, criterion: Criterion) -> bool {
        self.0 & criterion.bit() != 0
    }

    /// True if every flag of `other` is also set in `self`.
    pub const fn includes(self, other: Criteria) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(move |c| self.contains(*c))
    }

    /// Every distinct criteria set; there are 2^5 of them.
    pub fn every() -> impl Iterator<Item = Criteria> {
        (0..1u8 << Criterion::ALL.len()).map(Criteria)
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::DEFAULT
    }
}

impl From<Criterion> for Criteria {
    fn from(criterion: Criterion) -> Self {
        Criteria::STRICT.with(criterion)
    }
}

impl FromIterator<Criterion> for Criteria {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        iter.into_iter().fold(Criteria::STRICT, Criteria::with)
    }
}

impl BitOr for Criteria {
    type Output = Criteria;

    fn bitor(self, rhs: Criteria) -> Criteria {
        self.union(rhs)
    }
}

impl BitOr<Criterion> for Criteria {
    type Output = Criteria;

    fn bitor(self, rhs: Criterion) -> Criteria {
        self.with(rhs)
    }
}

impl BitOr for Criterion {
    type Output = Criteria;

    fn bitor(self, rhs: Criterion) -> Criteria {
        Criteria::from(self).with(rhs)
    }
}

impl Display for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("STRICT")
        } else {
            write!(f, "{}", self.iter().map(Criterion::name).join("|"))
        }
    }
}

impl Debug for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Criteria({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Criteria, Criterion};
    use std::collections::HashSet;

    #[test]
    fn insertion_order_does_not_matter() {
        let a: Criteria = vec![
            Criterion::AllowDomainLiterals,
            Criterion::AllowQuotedIdentifiers,
        ]
        .into_iter()
        .collect();
        let b = Criterion::AllowQuotedIdentifiers | Criterion::AllowDomainLiterals;
        assert_eq!(a, b);

        let mut keys = HashSet::new();
        keys.insert(a);
        assert!(keys.contains(&b));
    }

    #[test]
    fn presets() {
        assert!(Criteria::STRICT.is_empty());
        assert_eq!(Criteria::default(), Criteria::RFC_COMPLIANT);
        assert_eq!(Criteria::RECOMMENDED, Criteria::RFC_COMPLIANT);
        assert!(Criteria::RFC_COMPLIANT.contains(Criterion::AllowQuotedIdentifiers));
        assert!(Criteria::RFC_COMPLIANT.contains(Criterion::AllowDomainLiterals));
        assert!(!Criteria::RFC_COMPLIANT.contains(Criterion::AllowDotInAText));
        assert_eq!(Criteria::ALL.len(), 5);
        assert!(Criteria::ALL.includes(Criteria::RFC_COMPLIANT));
        assert!(!Criteria::RFC_COMPLIANT.includes(Criteria::ALL));
    }

    #[test]
    fn with_and_without() {
        let c = Criteria::STRICT.with(Criterion::AllowDotInAText);
        assert!(c.contains(Criterion::AllowDotInAText));
        assert_eq!(c.without(Criterion::AllowDotInAText), Criteria::STRICT);
        assert_eq!(Criteria::every().count(), 32);
        assert_eq!(Criteria::every().collect::<HashSet<_>>().len(), 32);
    }

    #[test]
    fn display() {
        assert_eq!(Criteria::STRICT.to_string(), "STRICT");
        assert_eq!(
            (Criterion::AllowParensInLocalPart | Criterion::AllowQuotedIdentifiers).to_string(),
            "ALLOW_QUOTED_IDENTIFIERS|ALLOW_PARENS_IN_LOCALPART"
        );
    }
}
