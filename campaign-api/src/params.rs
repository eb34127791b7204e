use campaign_core::models::TransportStatus;
use chrono::NaiveDate;

/// A value that may appear in a query string. Falsy values (empty text,
/// zero, `false`, `None`) serialize to nothing and are dropped.
pub trait QueryValue {
    fn to_query(&self) -> Option<String>;
}

impl QueryValue for str {
    fn to_query(&self) -> Option<String> {
        let trimmed = self.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl QueryValue for String {
    fn to_query(&self) -> Option<String> {
        self.as_str().to_query()
    }
}

impl QueryValue for bool {
    fn to_query(&self) -> Option<String> {
        self.then(|| "true".to_string())
    }
}

macro_rules! numeric_query_value {
    ($($t:ty),*) => {
        $(impl QueryValue for $t {
            fn to_query(&self) -> Option<String> {
                (*self != 0).then(|| self.to_string())
            }
        })*
    };
}

numeric_query_value!(i32, i64, u32, u64, usize);

impl QueryValue for NaiveDate {
    fn to_query(&self) -> Option<String> {
        Some(self.format("%Y-%m-%d").to_string())
    }
}

impl QueryValue for TransportStatus {
    fn to_query(&self) -> Option<String> {
        Some(self.as_str().to_string())
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query(&self) -> Option<String> {
        (**self).to_query()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query)
    }
}

/// Ordered query parameters with falsy values already removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl QueryValue) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl QueryValue) {
        if let Some(v) = value.to_query() {
            self.pairs.push((key.to_string(), v));
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_falsy_values() {
        let params = QueryParams::new()
            .with("constituency", "North")
            .with("search", "")
            .with("offset", 0usize)
            .with("limit", 25usize)
            .with("candidateId", None::<String>)
            .with("includeArchived", false)
            .with("since", NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(
            params.pairs(),
            &[
                ("constituency".to_string(), "North".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("since".to_string(), "2024-05-01".to_string()),
            ]
        );
        assert_eq!(params.get("limit"), Some("25"));
        assert!(QueryParams::new().with("q", "   ").is_empty());
    }
}
