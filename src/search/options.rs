use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Items revealed per `load_more()` step
pub const PAGE_SIZE: usize = 20;

/// Which copy of the query text Enter navigates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySource {
    /// Text as typed, possibly ahead of the visible results
    #[default]
    Raw,
    /// Text the visible results were computed from
    Deferred,
}

impl FromStr for QuerySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(QuerySource::Raw),
            "deferred" => Ok(QuerySource::Deferred),
            other => Err(format!("Unknown query source: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub placeholder: String,
    pub empty_message: String,
    pub loading_message: String,
    pub debounce: Duration,
    pub max_items: usize,
    pub enter_query_source: QuerySource,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            placeholder: "Search...".to_string(),
            empty_message: "No results found.".to_string(),
            loading_message: "Loading...".to_string(),
            debounce: Duration::from_millis(400),
            max_items: 100,
            enter_query_source: QuerySource::Raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_source_parse() {
        assert_eq!("raw".parse::<QuerySource>(), Ok(QuerySource::Raw));
        assert_eq!(" Deferred ".parse::<QuerySource>(), Ok(QuerySource::Deferred));
        assert!("latest".parse::<QuerySource>().is_err());
    }
}
