use std::sync::{Arc, OnceLock};

use crate::address::Address;
use crate::config::Config;
use crate::criteria::Criteria;
use crate::error::EncodingError;
use crate::extract::{self, MatchFields};
use crate::grammar::{Grammar, GrammarCache};
use crate::scan::ListScanner;
use crate::validate;

/// Entry point for every check and extraction.
///
/// Owns a [`GrammarCache`]; cloning a `Context` shares the cache.
#[derive(Debug, Clone, Default)]
pub struct Context {
    grammars: Arc<GrammarCache>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(grammars: Arc<GrammarCache>) -> Self {
        Context { grammars }
    }

    /// The process-wide context used by the crate-level functions.
    pub fn shared() -> &'static Context {
        static SHARED: OnceLock<Context> = OnceLock::new();
        SHARED.get_or_init(Context::new)
    }

    pub fn cache(&self) -> &GrammarCache {
        &self.grammars
    }

    pub fn grammar(&self, criteria: Criteria) -> Arc<Grammar> {
        self.grammars.get(criteria)
    }

    pub fn is_valid(&self, text: &str, criteria: Criteria) -> bool {
        validate::is_valid(&self.grammar(criteria), text)
    }

    pub fn is_valid_addr_spec(&self, text: &str, criteria: Criteria) -> bool {
        validate::is_valid_addr_spec(&self.grammar(criteria), text)
    }

    pub fn is_valid_mailbox_list(&self, text: &str, criteria: Criteria) -> bool {
        validate::is_valid_mailbox_list(&self.grammar(criteria), text)
    }

    pub fn is_valid_address_list(&self, text: &str, criteria: Criteria) -> bool {
        validate::is_valid_address_list(&self.grammar(criteria), text)
    }

    /// `<addr-spec>` or empty brackets, as in a `Return-Path` header.
    pub fn is_valid_return_path(&self, text: &str, criteria: Criteria) -> bool {
        validate::is_valid_return_path(&self.grammar(criteria), text)
    }

    pub fn return_path_bracket_contents<'t>(
        &self,
        text: &'t str,
        criteria: Criteria,
    ) -> Option<&'t str> {
        validate::return_path_contents(&self.grammar(criteria), text)
    }

    /// The address inside a valid return path. `Some("")` means the brackets
    /// hold no address, as in a bounce's `<>`.
    pub fn return_path_address(
        &self,
        text: &str,
        criteria: Criteria,
        comment_as_personal: bool,
    ) -> Option<String> {
        let grammar = self.grammar(criteria);
        let contents = validate::return_path_contents(&grammar, text)?;
        Some(
            extract::extract(&grammar, contents, comment_as_personal)
                .map(|fields| fields.address())
                .unwrap_or_default(),
        )
    }

    pub fn extract_parts(
        &self,
        text: &str,
        criteria: Criteria,
        comment_as_personal: bool,
    ) -> Option<MatchFields> {
        extract::extract(&self.grammar(criteria), text, comment_as_personal)
    }

    pub fn personal_name(
        &self,
        text: &str,
        criteria: Criteria,
        comment_as_personal: bool,
    ) -> Option<String> {
        self.extract_parts(text, criteria, comment_as_personal)
            .and_then(|fields| fields.personal)
    }

    pub fn local_part(&self, text: &str, criteria: Criteria) -> Option<String> {
        self.extract_parts(text, criteria, false)
            .map(|fields| fields.local_part)
    }

    pub fn domain(&self, text: &str, criteria: Criteria) -> Option<String> {
        self.extract_parts(text, criteria, false)
            .map(|fields| fields.domain)
    }

    /// Every mailbox of a header value, in order, groups flattened.
    pub fn extract_all_from_header(
        &self,
        text: &str,
        criteria: Criteria,
        comment_as_personal: bool,
    ) -> Vec<MatchFields> {
        self.scan_header(text, criteria, comment_as_personal)
            .collect()
    }

    pub fn scan_header<'t>(
        &self,
        text: &'t str,
        criteria: Criteria,
        comment_as_personal: bool,
    ) -> ListScanner<'t> {
        ListScanner::new(self.grammar(criteria), text, comment_as_personal)
    }

    /// `Ok(None)` if `text` is not a valid mailbox.
    pub fn address(&self, text: &str, config: &Config) -> Result<Option<Address>, EncodingError> {
        self.extract_parts(text, config.criteria, config.extract_comment_as_personal)
            .map(|fields| to_address(fields, config))
            .transpose()
    }

    /// Mailboxes whose personal name the charset cannot represent are left
    /// out.
    pub fn addresses_from_header(&self, text: &str, config: &Config) -> Vec<Address> {
        self.scan_header(text, config.criteria, config.extract_comment_as_personal)
            .filter_map(|fields| to_address(fields, config).ok())
            .collect()
    }
}

fn to_address(fields: MatchFields, config: &Config) -> Result<Address, EncodingError> {
    let address = fields.address();
    Address::with_charset(fields.personal, address, config.charset)
}
