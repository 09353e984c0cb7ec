//! In-memory filtering for the public directory.
//!
//! Filtering is a case-insensitive *substring* match on department and city,
//! ANDed together. Suggestions are the distinct values of the loaded list narrowed
//! by a case-insensitive *prefix* match, so they are stricter than the filter itself.

use serde::Deserialize;
use std::collections::BTreeSet;
use utoipa::IntoParams;

/// Anything that sits in a department and a city
pub trait Locality {
    fn department(&self) -> &str;
    fn city(&self) -> &str;
}

/// Filter text as typed by the visitor; empty fields match everything
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocalityFilter {
    /// Department text (substring, case-insensitive)
    #[serde(default)]
    pub department: String,

    /// City text (substring, case-insensitive)
    #[serde(default)]
    pub city: String,
}

impl LocalityFilter {
    #[cfg(test)]
    pub fn new(department: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            city: city.into(),
        }
    }

    pub fn matches<T: Locality>(&self, item: &T) -> bool {
        contains_ignore_case(item.department(), &self.department)
            && contains_ignore_case(item.city(), &self.city)
    }

    /// Keep the items matching both fields, preserving input order
    pub fn apply<T: Locality + Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    prefix.is_empty() || value.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Distinct values of `key`, sorted ascending, narrowed to those starting with `input`
pub fn suggestions<'a, T, F>(items: &'a [T], key: F, input: &str) -> Vec<String>
where
    F: Fn(&'a T) -> &'a str,
{
    items
        .iter()
        .map(key)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .filter(|value| starts_with_ignore_case(value, input))
        .map(str::to_string)
        .collect()
}

pub fn department_suggestions<T: Locality>(items: &[T], input: &str) -> Vec<String> {
    suggestions(items, |item| item.department(), input)
}

pub fn city_suggestions<T: Locality>(items: &[T], input: &str) -> Vec<String> {
    suggestions(items, |item| item.city(), input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Place {
        department: String,
        city: String,
    }

    impl Locality for Place {
        fn department(&self) -> &str {
            &self.department
        }

        fn city(&self) -> &str {
            &self.city
        }
    }

    fn place(department: &str, city: &str) -> Place {
        Place {
            department: department.to_string(),
            city: city.to_string(),
        }
    }

    fn sample() -> Vec<Place> {
        vec![
            place("Cundinamarca", "Bogotá"),
            place("Antioquia", "Medellín"),
            place("Antioquia", "Envigado"),
            place("Valle del Cauca", "Cali"),
            place("Cundinamarca", "Soacha"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let items = sample();
        assert_eq!(LocalityFilter::default().apply(&items), items);
    }

    #[test]
    fn test_department_substring_case_insensitive() {
        let items = sample();
        let result = LocalityFilter::new("TIOQ", "").apply(&items);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.department == "Antioquia"));
    }

    #[test]
    fn test_both_fields_are_anded() {
        let items = sample();
        let result = LocalityFilter::new("cundinamarca", "soa").apply(&items);
        assert_eq!(result, vec![place("Cundinamarca", "Soacha")]);

        let none = LocalityFilter::new("valle", "bogo").apply(&items);
        assert!(none.is_empty());
    }

    #[test]
    fn test_non_ascii_case_folding() {
        let items = sample();
        let result = LocalityFilter::new("", "MEDELLÍN").apply(&items);
        assert_eq!(result, vec![place("Antioquia", "Medellín")]);
    }

    #[test]
    fn test_filter_preserves_order() {
        let items = sample();
        let result = LocalityFilter::new("a", "").apply(&items);
        let expected: Vec<Place> = items
            .iter()
            .filter(|p| p.department.to_lowercase().contains('a'))
            .cloned()
            .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_suggestions_are_distinct_and_sorted() {
        let items = sample();
        assert_eq!(
            department_suggestions(&items, ""),
            vec!["Antioquia", "Cundinamarca", "Valle del Cauca"]
        );
    }

    #[test]
    fn test_suggestions_use_prefix_match() {
        let items = sample();
        assert_eq!(city_suggestions(&items, "me"), vec!["Medellín"]);
        // "ll" is inside "Medellín" but is not a prefix of any city
        assert!(city_suggestions(&items, "ll").is_empty());
        // while the filter itself still matches it
        assert_eq!(LocalityFilter::new("", "ll").apply(&items).len(), 1);
    }

    #[test]
    fn test_suggestions_only_come_from_loaded_items() {
        let items = vec![place("Boyacá", "Tunja")];
        assert_eq!(department_suggestions(&items, "b"), vec!["Boyacá"]);
        assert!(department_suggestions(&items, "antio").is_empty());
    }
}
