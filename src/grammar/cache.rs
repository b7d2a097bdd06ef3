use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use super::Grammar;
use crate::criteria::Criteria;

/// Compiled grammars, one per criteria set, built on first use and kept for
/// the life of the cache.
///
/// Two threads missing on the same criteria may both compile it; the first
/// insert wins and every caller gets that `Arc`.
#[derive(Debug, Default)]
pub struct GrammarCache {
    grammars: RwLock<HashMap<Criteria, Arc<Grammar>>>,
}

impl GrammarCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, criteria: Criteria) -> Arc<Grammar> {
        let cached = self
            .grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&criteria)
            .cloned();
        if let Some(grammar) = cached {
            return grammar;
        }

        let built = Arc::new(Grammar::compile(criteria));
        let mut grammars = self
            .grammars
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match grammars.entry(criteria) {
            Entry::Occupied(e) => Arc::clone(e.get()),
            Entry::Vacant(e) => {
                debug!("Caching grammar for {}", criteria);
                Arc::clone(e.insert(built))
            }
        }
    }

    pub fn contains(&self, criteria: Criteria) -> bool {
        self.grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&criteria)
    }

    pub fn len(&self) -> usize {
        self.grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::GrammarCache;
    use crate::criteria::{Criteria, Criterion};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn equal_criteria_share_a_grammar() {
        let cache = GrammarCache::new();
        assert!(cache.is_empty());
        let a = cache.get(Criterion::AllowDomainLiterals | Criterion::AllowQuotedIdentifiers);
        let b = cache.get(Criterion::AllowQuotedIdentifiers | Criterion::AllowDomainLiterals);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let strict = cache.get(Criteria::STRICT);
        assert!(!Arc::ptr_eq(&a, &strict));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(Criteria::STRICT));
        assert!(!cache.contains(Criteria::ALL));
    }

    #[test]
    fn concurrent_get_or_create() {
        let cache = Arc::new(GrammarCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get(Criteria::DEFAULT))
            })
            .collect();
        let grammars: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for g in &grammars {
            assert!(Arc::ptr_eq(g, &grammars[0]));
            assert_eq!(g.criteria(), Criteria::DEFAULT);
        }
        assert_eq!(cache.len(), 1);
    }
}
