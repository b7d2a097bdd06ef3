//! RFC 2822 tokens, composed bottom-up for one criteria set.

use super::rule::{
    alt, class, lazy_opt, lit, many0, many1, opt, raw, repeat, seq, slot, Branch, Rule, Slot,
};
use crate::criteria::{Criteria, Criterion};

const NO_WS_CTL: &str = r"\x01-\x08\x0B\x0C\x0E-\x1F\x7F";
const ATEXT: &str = r"a-zA-Z0-9\x21\x23-\x27\x2A\x2B\x2D\x2F\x3D\x3F\x5E-\x60\x7B-\x7E";
const THAI: &str = r"\x{0E00}-\x{0E7F}";
const WSP: &str = r" \t";

/// The top-level rules a grammar compiles.
pub struct Rules {
    pub mailbox: Rule,
    pub addr_spec: Rule,
    pub mailbox_list: Rule,
    pub address: Rule,
    pub group_prefix: Rule,
    pub return_path: Rule,
    pub comment: Rule,
    pub quoted_string: Rule,
}

/// `cfws? inner cfws?`, with the trailing CFWS captured when asked.
fn cfws_around(cfws: &Rule, inner: &Rule, capture_trailing: bool) -> Rule {
    let trailing = if capture_trailing {
        slot(Slot::TrailingCfws, cfws)
    } else {
        cfws.clone()
    };
    seq(&[&opt(cfws), inner, &opt(&trailing)])
}

/// `"` (fws? (q | quoted-pair))* fws? `"`
fn quoted(fws: &Rule, q: &Rule, quoted_pair: &Rule) -> Rule {
    seq(&[
        &lit("\""),
        &many0(&seq(&[&opt(fws), &alt(&[q, quoted_pair])])),
        &opt(fws),
        &lit("\""),
    ])
}

pub fn compose(criteria: Criteria) -> Rules {
    let wsp = class(&[WSP]);
    let fws = seq(&[&opt(&seq(&[&many0(&wsp), &raw(r"\r\n")])), &many1(&wsp)]);

    let text = class(&[r"\x01-\x09\x0B\x0C\x0E-\x7F"]);
    let quoted_pair = seq(&[&lit("\\"), &text]);

    let ctext = class(&[NO_WS_CTL, r"\x21-\x27\x2A-\x5B\x5D-\x7E"]);
    let comment = seq(&[
        &lit("("),
        &many0(&seq(&[&opt(&fws), &alt(&[&ctext, &quoted_pair])])),
        &opt(&fws),
        &lit(")"),
    ]);
    let fws_comment = seq(&[&opt(&fws), &comment]);
    let cfws = seq(&[&many0(&fws_comment), &alt(&[&fws_comment, &fws])]);

    let mut atext_ranges = vec![ATEXT];
    if criteria.contains(Criterion::AllowDotInAText) {
        atext_ranges.push(r"\x2E");
    }
    if criteria.contains(Criterion::AllowSquareBracketsInAText) {
        atext_ranges.push(r"\x5B\x5D");
    }
    let atext = class(&atext_ranges);
    let atom = seq(&[&opt(&cfws), &many1(&atext), &opt(&cfws)]);

    let regular_atext = many1(&class(&[THAI, ATEXT]));
    let dot_atom_text = seq(&[
        &regular_atext,
        &many0(&seq(&[&lit("."), &regular_atext])),
    ]);

    let qtext = class(&[NO_WS_CTL, r"\x21\x23-\x5B\x5D-\x7E"]);
    let local_qtext = if criteria.contains(Criterion::AllowParensInLocalPart) {
        qtext.clone()
    } else {
        class(&[NO_WS_CTL, r"\x21\x23-\x27\x2A-\x5B\x5D-\x7E"])
    };
    let bare_quoted_string = quoted(&fws, &qtext, &quoted_pair);
    let quoted_string = seq(&[&opt(&cfws), &bare_quoted_string, &opt(&cfws)]);

    let word = alt(&[&atom, &quoted_string]);
    let phrase = seq(&[&word, &many0(&seq(&[&fws, &word]))]);

    let local_part = alt(&[
        &cfws_around(&cfws, &slot(Slot::LocalPart, &dot_atom_text), false),
        &cfws_around(
            &cfws,
            &slot(Slot::LocalPart, &quoted(&fws, &local_qtext, &quoted_pair)),
            false,
        ),
    ]);

    let domain = |capture_trailing: bool| {
        if criteria.contains(Criterion::AllowDomainLiterals) {
            let dtext = class(&[NO_WS_CTL, r"\x21-\x5A\x5E-\x7E"]);
            let domain_literal = seq(&[
                &lit("["),
                &many0(&seq(&[&opt(&fws), &alt(&[&dtext, &quoted_pair])])),
                &opt(&fws),
                &lit("]"),
            ]);
            alt(&[
                &cfws_around(
                    &cfws,
                    &slot(Slot::Domain, &dot_atom_text),
                    capture_trailing,
                ),
                &cfws_around(
                    &cfws,
                    &slot(Slot::Domain, &domain_literal),
                    capture_trailing,
                ),
            ])
        } else {
            let letdig = class(&["a-zA-Z0-9"]);
            let label = seq(&[
                &letdig,
                &opt(&seq(&[
                    &repeat(&class(&[r"a-zA-Z0-9\x2D"]), 0, 61),
                    &letdig,
                ])),
            ]);
            let hostname = seq(&[
                &label,
                &many0(&seq(&[&lit("."), &label])),
                &lit("."),
                &repeat(&class(&["a-zA-Z"]), 2, 26),
            ]);
            cfws_around(&cfws, &slot(Slot::Domain, &hostname), capture_trailing)
        }
    };

    let addr_spec = seq(&[&local_part, &lit("@"), &domain(false)]);
    let addr_spec_trailing = seq(&[&local_part, &lit("@"), &domain(true)]);

    let angle_addr = seq(&[
        &opt(&cfws),
        &lit("<"),
        &addr_spec,
        &lit(">"),
        &opt(&slot(Slot::TrailingCfws, &cfws)),
    ]);
    let name_addr = seq(&[&lazy_opt(&slot(Slot::Personal, &phrase)), &angle_addr]);

    let bare_mailbox = slot(Slot::Form, &addr_spec_trailing).within(Branch::AddrSpec);
    let mailbox = if criteria.contains(Criterion::AllowQuotedIdentifiers) {
        alt(&[
            &slot(Slot::Form, &name_addr).within(Branch::NameAddr),
            &bare_mailbox,
        ])
    } else {
        alt(&[&bare_mailbox])
    };

    let mailbox_list = seq(&[&mailbox, &many0(&seq(&[&lit(","), &mailbox]))]);
    let group_prefix = seq(&[&phrase, &lit(":")]);
    let group = seq(&[
        &group_prefix,
        &opt(&alt(&[&cfws, &mailbox_list])),
        &lit(";"),
        &opt(&cfws),
    ]);
    let address = alt(&[&mailbox, &group]);

    let return_path = seq(&[
        &opt(&cfws),
        &lit("<"),
        &slot(Slot::BracketContents, &alt(&[&opt(&cfws), &addr_spec])),
        &lit(">"),
        &opt(&cfws),
    ]);

    Rules {
        mailbox,
        addr_spec,
        mailbox_list,
        address,
        group_prefix,
        return_path,
        comment,
        quoted_string: bare_quoted_string,
    }
}
