//! Field matching between global filters and external data sources.
//!
//! Data sources (pivots, lists, charts, …) each decide which of their fields
//! a global filter constrains. When a new data source targets a model that
//! another one already targets, its matchings can start as a copy.

use std::sync::Arc;

use globalfilter_common::{FilterId, GlobalFilter};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Which field of a data source a filter applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Dotted field path on the data source's model.
    pub chain: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldMatch {
    pub fn new(chain: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            field_type: field_type.into(),
        }
    }
}

/// Filter id → field match.
pub type FieldMatchingMap = FxHashMap<FilterId, FieldMatch>;

/// One family of data sources (one per data-source type).
pub trait FieldMatcher {
    /// Ids of every data-source instance this matcher knows.
    fn ids(&self) -> Vec<String>;

    /// Model targeted by an instance.
    fn model(&self, instance_id: &str) -> Option<String>;

    fn field_matching(&self, instance_id: &str, filter_id: &str) -> Option<FieldMatch>;
}

/// Registered matchers, iterated in registration order.
#[derive(Default, Clone)]
pub struct MatcherRegistry {
    matchers: Vec<(String, Arc<dyn FieldMatcher>)>,
}

impl std::fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherRegistry")
            .field("matchers", &self.names())
            .finish()
    }
}

impl MatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `matcher` under `name`, returning the one it replaces.
    ///
    /// A replacement keeps the original registration slot.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        matcher: Arc<dyn FieldMatcher>,
    ) -> Option<Arc<dyn FieldMatcher>> {
        let name = name.into();
        if let Some(slot) = self.matchers.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, matcher));
        }
        self.matchers.push((name, matcher));
        None
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn FieldMatcher>> {
        let idx = self.matchers.iter().position(|(n, _)| n == name)?;
        Some(self.matchers.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FieldMatcher>> {
        self.matchers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }

    pub fn names(&self) -> Vec<&str> {
        self.matchers.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn FieldMatcher)> {
        self.matchers.iter().map(|(n, m)| (n.as_str(), m.as_ref()))
    }
}

/// Copies matchings from the first data source already targeting a model.
pub struct FieldMatchingResolver<'r> {
    registry: &'r MatcherRegistry,
}

impl<'r> FieldMatchingResolver<'r> {
    pub fn new(registry: &'r MatcherRegistry) -> Self {
        Self { registry }
    }

    /// Matchings for `model`, or an empty map when nothing targets it.
    ///
    /// The first matching instance wins; matchings of later instances are
    /// never merged in.
    pub fn resolve(&self, model: &str, filters: &[GlobalFilter]) -> FieldMatchingMap {
        let mut out = FieldMatchingMap::default();
        if filters.is_empty() {
            return out;
        }
        for (_name, matcher) in self.registry.iter() {
            let found = matcher
                .ids()
                .into_iter()
                .find(|id| matcher.model(id).as_deref() == Some(model));
            let Some(instance) = found else {
                continue;
            };
            #[cfg(feature = "tracing")]
            tracing::debug!(
                matcher = _name,
                instance = instance.as_str(),
                model,
                "copying field matchings"
            );
            for filter in filters {
                if let Some(field) = matcher.field_matching(&instance, &filter.id) {
                    out.insert(filter.id.clone(), field);
                }
            }
            break;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct FixedMatcher {
        instances: Vec<(String, String, Vec<(String, FieldMatch)>)>,
        calls: Cell<usize>,
    }

    impl FixedMatcher {
        fn instance(mut self, id: &str, model: &str, fields: &[(&str, &str, &str)]) -> Self {
            self.instances.push((
                id.to_string(),
                model.to_string(),
                fields
                    .iter()
                    .map(|(f, chain, ty)| (f.to_string(), FieldMatch::new(*chain, *ty)))
                    .collect(),
            ));
            self
        }
    }

    impl FieldMatcher for FixedMatcher {
        fn ids(&self) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            self.instances.iter().map(|(id, _, _)| id.clone()).collect()
        }

        fn model(&self, instance_id: &str) -> Option<String> {
            self.instances
                .iter()
                .find(|(id, _, _)| id == instance_id)
                .map(|(_, m, _)| m.clone())
        }

        fn field_matching(&self, instance_id: &str, filter_id: &str) -> Option<FieldMatch> {
            let (_, _, fields) = self.instances.iter().find(|(id, _, _)| id == instance_id)?;
            fields
                .iter()
                .find(|(f, _)| f == filter_id)
                .map(|(_, m)| m.clone())
        }
    }

    fn filters() -> Vec<GlobalFilter> {
        vec![
            GlobalFilter::text("f1", "Name"),
            GlobalFilter::relation("f2", "Partner", "res.partner"),
        ]
    }

    #[test]
    fn registry_keeps_slot_on_replace() {
        let mut registry = MatcherRegistry::new();
        registry.register("pivot", Arc::new(FixedMatcher::default()));
        registry.register("list", Arc::new(FixedMatcher::default()));
        assert!(
            registry
                .register("pivot", Arc::new(FixedMatcher::default()))
                .is_some()
        );
        assert_eq!(registry.names(), vec!["pivot", "list"]);
        assert!(registry.unregister("pivot").is_some());
        assert!(registry.unregister("pivot").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_filter_list_short_circuits() {
        let matcher = Arc::new(FixedMatcher::default().instance(
            "1",
            "sale.order",
            &[("f1", "name", "char")],
        ));
        let mut registry = MatcherRegistry::new();
        registry.register("pivot", matcher.clone());
        let map = FieldMatchingResolver::new(&registry).resolve("sale.order", &[]);
        assert!(map.is_empty());
        assert_eq!(matcher.calls.get(), 0);
    }

    #[test]
    fn first_matching_instance_wins_without_merge() {
        let mut registry = MatcherRegistry::new();
        registry.register(
            "pivot",
            Arc::new(
                FixedMatcher::default()
                    .instance("1", "crm.lead", &[("f1", "name", "char")])
                    .instance("2", "sale.order", &[("f2", "partner_id", "many2one")]),
            ),
        );
        registry.register(
            "list",
            Arc::new(FixedMatcher::default().instance(
                "9",
                "sale.order",
                &[("f1", "client_order_ref", "char")],
            )),
        );
        let map = FieldMatchingResolver::new(&registry).resolve("sale.order", &filters());
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("f2"),
            Some(&FieldMatch::new("partner_id", "many2one"))
        );
        assert!(!map.contains_key("f1"));
    }

    #[test]
    fn no_instance_for_model_gives_empty_map() {
        let mut registry = MatcherRegistry::new();
        registry.register(
            "pivot",
            Arc::new(FixedMatcher::default().instance("1", "crm.lead", &[("f1", "name", "char")])),
        );
        let map = FieldMatchingResolver::new(&registry).resolve("account.move", &filters());
        assert!(map.is_empty());
    }
}
