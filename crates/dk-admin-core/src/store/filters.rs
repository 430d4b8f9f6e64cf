use std::collections::BTreeMap;

use crate::resources::{FilterKey, Resource};

/// Active client-side narrowing: search text plus facet values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    search: String,
    facets: BTreeMap<FilterKey, String>,
}

impl ListFilters {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn facet(&self, key: FilterKey) -> Option<&str> {
        self.facets.get(&key).map(String::as_str)
    }

    pub fn facets(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.facets.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.facets.is_empty()
    }

    pub(crate) fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_string();
    }

    /// Blank values clear the facet ("all").
    pub(crate) fn set_facet(&mut self, key: FilterKey, value: Option<&str>) {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => {
                self.facets.insert(key, v.to_string());
            }
            None => {
                self.facets.remove(&key);
            }
        }
    }

    /// Whether `record` passes every active filter.
    pub fn matches<R: Resource>(&self, record: &R::Record) -> bool {
        let facets_match = self.facets.iter().all(|(key, wanted)| {
            R::facet(record, *key).is_some_and(|value| value.eq_ignore_ascii_case(wanted))
        });
        if !facets_match {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        R::search_text(record)
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Cpu, CpuResource};

    fn cpu(brand: &str, model: &str) -> Cpu {
        serde_json::from_value(serde_json::json!({
            "brand": brand,
            "model": model,
            "slug": model.to_lowercase().replace(' ', "-"),
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = ListFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches::<CpuResource>(&cpu("AMD", "Ryzen 5 7600")));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut filters = ListFilters::default();
        filters.set_search("  RYZEN 5 ");
        assert!(filters.matches::<CpuResource>(&cpu("AMD", "Ryzen 5 7600")));
        assert!(!filters.matches::<CpuResource>(&cpu("Intel", "Core i5-14600K")));
    }

    #[test]
    fn test_facet_match_ignores_case_and_blank_clears() {
        let mut filters = ListFilters::default();
        filters.set_facet(FilterKey::Brand, Some("amd"));
        assert!(filters.matches::<CpuResource>(&cpu("AMD", "Ryzen 5 7600")));
        assert!(!filters.matches::<CpuResource>(&cpu("Intel", "Core i5")));

        filters.set_facet(FilterKey::Brand, Some("  "));
        assert_eq!(filters.facet(FilterKey::Brand), None);
        assert!(filters.matches::<CpuResource>(&cpu("Intel", "Core i5")));
    }

    #[test]
    fn test_facet_unknown_to_resource_excludes_record() {
        let mut filters = ListFilters::default();
        filters.set_facet(FilterKey::Resolution, Some("1440p"));
        assert!(!filters.matches::<CpuResource>(&cpu("AMD", "Ryzen 5 7600")));
    }
}
