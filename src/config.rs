use std::str::FromStr;

use anyhow::{anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{multispace0, multispace1, one_of},
    combinator::{all_consuming, value},
    multi::separated_list1,
    sequence::delimited,
    IResult,
};

use crate::criteria::{Criteria, Criterion};

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}
#[test]
fn parse_name() {
    assert_eq!(name("dot-in-a-text, x"), Ok((", x", "dot-in-a-text")));
    assert!(name(",").is_err());
}

fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        value((), delimited(multispace0, one_of(",|+"), multispace0)),
        value((), multispace1),
    ))(input)
}

fn names(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(separator, name),
        multispace0,
    ))(input)
}
#[test]
fn parse_names() {
    assert_eq!(
        names(" strict |domain_literals+ x ,y "),
        Ok(("", vec!["strict", "domain_literals", "x", "y"]))
    );
    assert!(names("").is_err());
    assert!(names("a,,b").is_err());
}

fn lookup(name: &str) -> anyhow::Result<Criteria> {
    let normalized = name.to_ascii_uppercase().replace('-', "_");
    let flag = normalized.strip_prefix("ALLOW_").unwrap_or(&normalized);
    Ok(match flag {
        "STRICT" | "NONE" => Criteria::STRICT,
        "RFC_COMPLIANT" => Criteria::RFC_COMPLIANT,
        "RECOMMENDED" => Criteria::RECOMMENDED,
        "DEFAULT" => Criteria::DEFAULT,
        "ALL" => Criteria::ALL,
        "QUOTED_IDENTIFIERS" => Criterion::AllowQuotedIdentifiers.into(),
        "DOMAIN_LITERALS" => Criterion::AllowDomainLiterals.into(),
        "DOT_IN_A_TEXT" | "DOT_IN_ATEXT" => Criterion::AllowDotInAText.into(),
        "SQUARE_BRACKETS_IN_A_TEXT" | "SQUARE_BRACKETS_IN_ATEXT" => {
            Criterion::AllowSquareBracketsInAText.into()
        }
        "PARENS_IN_LOCALPART" | "PARENS_IN_LOCAL_PART" => Criterion::AllowParensInLocalPart.into(),
        _ => bail!("Unrecognized criterion: {}", name),
    })
}

/// Parses presets and flag names separated by `,`, `|`, `+` or whitespace.
///
/// Names are case-insensitive, `-` and `_` are interchangeable and the
/// `ALLOW_` prefix is optional, so `"rfc-compliant + dot-in-a-text"` works.
impl FromStr for Criteria {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Criteria> {
        let (_, names) = names(s).map_err(|e| anyhow!("Malformed criteria {:?}: {}", s, e))?;
        names
            .into_iter()
            .try_fold(Criteria::STRICT, |acc, name| Ok(acc | lookup(name)?))
    }
}

/// Settings for the operations that build [`crate::Address`] values.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub criteria: Criteria,
    /// Use the first trailing comment as the personal name when there is no
    /// display name.
    pub extract_comment_as_personal: bool,
    /// Charset personal names must be representable in.
    pub charset: &'static Encoding,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            criteria: Criteria::DEFAULT,
            extract_comment_as_personal: false,
            charset: UTF_8,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn extract_comment_as_personal(mut self, extract: bool) -> Self {
        self.extract_comment_as_personal = extract;
        self
    }

    pub fn charset(mut self, charset: &'static Encoding) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the charset from a WHATWG label such as `"latin1"` or `"utf-8"`.
    pub fn with_charset_label(self, label: &str) -> anyhow::Result<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(charset) => Ok(self.charset(charset)),
            None => bail!("Unknown charset label: {}", label),
        }
    }
}
