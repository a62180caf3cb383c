//! Free-text search and status filtering over fetched listings.

use serde::Deserialize;

/// Records that can be narrowed by a search box.
pub trait Searchable {
    /// Fields the query is matched against. `None` marks a missing value,
    /// which never matches but does not disqualify the other fields.
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// Lifecycle state used by the status filter, if the record has one.
    fn status(&self) -> Option<&str> {
        None
    }
}

/// Exact (case-insensitive) status predicate. `"all"` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(raw.to_lowercase())
        }
    }

    fn accepts(&self, status: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status.is_some_and(|s| s.to_lowercase() == *wanted),
        }
    }
}

impl From<String> for StatusFilter {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// True when `record` passes both the text and the status predicate.
pub fn matches<T: Searchable>(record: &T, query: &str, status: &StatusFilter) -> bool {
    let needle = query.to_lowercase();
    let text_ok = needle.is_empty()
        || record
            .search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));
    text_ok && status.accepts(record.status())
}

/// Keeps the records matching `query` and `status`, preserving their order.
pub fn filter_records<T: Searchable>(records: Vec<T>, query: &str, status: &StatusFilter) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| matches(r, query, status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        email: &'static str,
        name: Option<&'static str>,
    }

    impl Searchable for Person {
        fn search_fields(&self) -> Vec<Option<&str>> {
            vec![Some(self.email), self.name]
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Charge {
        email: Option<&'static str>,
        method: &'static str,
        currency: &'static str,
        status: &'static str,
    }

    impl Searchable for Charge {
        fn search_fields(&self) -> Vec<Option<&str>> {
            vec![self.email, Some(self.method), Some(self.currency)]
        }
        fn status(&self) -> Option<&str> {
            Some(self.status)
        }
    }

    fn charge(status: &'static str) -> Charge {
        Charge {
            email: Some("a@x.com"),
            method: "Credit Card",
            currency: "USD",
            status,
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person {
                email: "a@x.com",
                name: Some("Ann"),
            },
            Person {
                email: "b@x.com",
                name: None,
            },
        ]
    }

    #[test]
    fn empty_input_stays_empty() {
        for q in ["", "ann", "@"] {
            assert!(filter_records(Vec::<Person>::new(), q, &StatusFilter::All).is_empty());
        }
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        assert_eq!(filter_records(people(), "", &StatusFilter::All), people());
    }

    #[test]
    fn query_is_case_insensitive_and_skips_missing_fields() {
        let out = filter_records(people(), "ann", &StatusFilter::All);
        assert_eq!(out, vec![people()[0].clone()]);

        let out = filter_records(people(), "B@X", &StatusFilter::All);
        assert_eq!(out, vec![people()[1].clone()]);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let once = filter_records(people(), "x.com", &StatusFilter::All);
        let twice = filter_records(once.clone(), "x.com", &StatusFilter::All);
        assert_eq!(once, twice);
    }

    #[test]
    fn status_filter_is_case_insensitive() {
        let charges = vec![charge("Completed"), charge("Pending"), charge("Failed")];
        let out = filter_records(charges, "", &StatusFilter::parse("pending"));
        assert_eq!(out, vec![charge("Pending")]);
    }

    #[test]
    fn status_and_query_are_combined() {
        let mut eur = charge("Pending");
        eur.currency = "EUR";
        let charges = vec![charge("Pending"), eur.clone(), charge("Completed")];
        let out = filter_records(charges, "eur", &StatusFilter::parse("PENDING"));
        assert_eq!(out, vec![eur]);
    }

    #[test]
    fn charge_without_user_still_matches_other_fields() {
        let mut orphan = charge("Completed");
        orphan.email = None;
        assert!(matches(&orphan, "credit", &StatusFilter::All));
        assert!(!matches(&orphan, "a@x", &StatusFilter::All));
    }

    #[test]
    fn all_sentinel_and_blank_disable_status() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse("ALL"), StatusFilter::All);
        assert_eq!(StatusFilter::parse("  "), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("Failed"),
            StatusFilter::Only("failed".into())
        );
    }

    #[test]
    fn status_filter_rejects_records_without_status() {
        assert!(filter_records(people(), "", &StatusFilter::parse("pending")).is_empty());
    }

    #[test]
    fn status_filter_deserializes_from_query_string() {
        let f: StatusFilter = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(f, StatusFilter::Only("completed".into()));
    }
}
