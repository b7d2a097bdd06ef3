//! Flattening an address-list header, groups included, into mailboxes.
//!
//! The scan never backtracks: each step prefix-matches at the current
//! position and either moves forward or stops. Group names are dropped; the
//! mailboxes inside a group come out in line with the rest of the list.

use std::sync::Arc;

use enum_kinds::EnumKind;
use log::trace;
use memmem::{Searcher, TwoWaySearcher};

use crate::extract::{fields_from_captures, MatchFields};
use crate::grammar::Grammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumKind)]
#[enum_kind(ScanStateKind)]
pub enum ScanState {
    Scanning,
    /// Past a group's `:`, before its first member. If no mailbox can be
    /// read here, the rest of the group up to its `;` is skipped.
    InsideGroup,
    /// Past a group's `;`. Anything up to the next `,` is ignored.
    AfterGroupEnd { resume_at: usize },
}

/// Lazy iterator over the mailboxes of a header value.
///
/// Stops at the first thing that is neither a mailbox, a group opening nor a
/// group closing; whatever was found before that is still yielded.
pub struct ListScanner<'t> {
    grammar: Arc<Grammar>,
    text: &'t str,
    pos: usize,
    state: ScanState,
    comment_as_personal: bool,
    done: bool,
    commas: TwoWaySearcher<'static>,
    semicolons: TwoWaySearcher<'static>,
}

impl<'t> ListScanner<'t> {
    pub fn new(grammar: Arc<Grammar>, text: &'t str, comment_as_personal: bool) -> Self {
        ListScanner {
            grammar,
            text,
            pos: 0,
            state: ScanState::Scanning,
            comment_as_personal,
            done: false,
            commas: TwoWaySearcher::new(b","),
            semicolons: TwoWaySearcher::new(b";"),
        }
    }

    pub fn state(&self) -> ScanStateKind {
        ScanStateKind::from(&self.state)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn finish(&mut self) {
        trace!("Scan finished at {} in {:?}", self.pos, self.state());
        self.done = true;
    }

    fn transition(&mut self, state: ScanState) {
        trace!(
            "Scan at {}: {:?} -> {:?}",
            self.pos,
            self.state(),
            ScanStateKind::from(&state)
        );
        self.state = state;
    }

    /// Runs one step of the scan, returning the mailbox it produced if any.
    fn step(&mut self) -> Option<MatchFields> {
        let text = self.text;
        let len = text.len();

        if let ScanState::AfterGroupEnd { resume_at } = self.state {
            let comma = self
                .commas
                .search_in(&text.as_bytes()[resume_at..])
                .map(|offset| resume_at + offset);
            match comma {
                Some(comma) if comma + 1 < len => {
                    self.pos = comma + 1;
                    self.transition(ScanState::Scanning);
                }
                _ => self.finish(),
            }
            return None;
        }

        if self.pos >= len {
            self.finish();
            return None;
        }

        // A `;` closes the group, but a mailbox may still start right after it.
        let after_semicolon = text[self.pos..].starts_with(';');
        if after_semicolon {
            self.pos += 1;
            if self.pos >= len {
                self.finish();
                return None;
            }
            self.transition(ScanState::AfterGroupEnd {
                resume_at: self.pos,
            });
        }

        let rest = &text[self.pos..];
        let grammar = Arc::clone(&self.grammar);
        if let Some(caps) = grammar.mailbox_prefix.captures(rest) {
            let end = self.pos + caps[0].len();
            let separator = text[end..].chars().next();
            if !matches!(separator, None | Some(',') | Some(';')) {
                self.finish();
                return None;
            }
            let fields = fields_from_captures(&grammar, &caps, self.comment_as_personal);
            trace!("Scan at {}: mailbox ends at {}", self.pos, end);
            if end + 1 >= len {
                self.pos = len;
                self.finish();
            } else if separator == Some(';') {
                self.pos = end + 1;
                self.transition(ScanState::AfterGroupEnd { resume_at: end + 1 });
            } else {
                self.pos = end + 1;
                self.transition(ScanState::Scanning);
            }
            return fields;
        }

        if after_semicolon {
            return None;
        }

        if let Some(m) = grammar.group_prefix.find(rest) {
            let end = self.pos + m.end();
            if end >= len {
                self.finish();
            } else {
                self.pos = end;
                self.transition(ScanState::InsideGroup);
            }
            return None;
        }

        if self.state == ScanState::InsideGroup {
            let semicolon = self
                .semicolons
                .search_in(rest.as_bytes())
                .map(|offset| self.pos + offset);
            match semicolon {
                Some(semicolon) if semicolon + 1 < len => {
                    self.pos = semicolon + 1;
                    self.transition(ScanState::AfterGroupEnd {
                        resume_at: semicolon + 1,
                    });
                }
                _ => self.finish(),
            }
            return None;
        }

        self.finish();
        None
    }
}

impl<'t> Iterator for ListScanner<'t> {
    type Item = MatchFields;

    fn next(&mut self) -> Option<MatchFields> {
        while !self.done {
            if let Some(fields) = self.step() {
                return Some(fields);
            }
        }
        None
    }
}
