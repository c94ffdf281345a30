//! Optional query parameters for read operations.

use chrono::{DateTime, Utc};

/// Field selection, pagination and time-range options for a GET request.
///
/// ```
/// use fbgraph_core::Reading;
///
/// let reading = Reading::new().fields(["id", "snippet"]).limit(10);
/// assert_eq!(
///     reading.query_pairs(),
///     vec![("fields".to_string(), "id,snippet".to_string()), ("limit".to_string(), "10".to_string())]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    fields: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    before: Option<String>,
    after: Option<String>,
    locale: Option<String>,
    summary: bool,
    filter: Option<String>,
}

impl Reading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the response to these fields. Repeated calls accumulate.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Cursor of the page boundary to read backwards from.
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Cursor of the page boundary to read forwards from.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Ask for the `summary` object (total counts) alongside the list.
    pub fn summary(mut self) -> Self {
        self.summary = true;
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Query parameters in a fixed order. Times are sent as unix seconds.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: String| pairs.push((key.to_string(), value));

        if !self.fields.is_empty() {
            push("fields", self.fields.join(","));
        }
        if let Some(limit) = self.limit {
            push("limit", limit.to_string());
        }
        if let Some(offset) = self.offset {
            push("offset", offset.to_string());
        }
        if let Some(since) = self.since {
            push("since", since.timestamp().to_string());
        }
        if let Some(until) = self.until {
            push("until", until.timestamp().to_string());
        }
        if let Some(before) = &self.before {
            push("before", before.clone());
        }
        if let Some(after) = &self.after {
            push("after", after.clone());
        }
        if let Some(locale) = &self.locale {
            push("locale", locale.clone());
        }
        if self.summary {
            push("summary", "true".to_string());
        }
        if let Some(filter) = &self.filter {
            push("filter", filter.clone());
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_reading_has_no_pairs() {
        assert!(Reading::new().query_pairs().is_empty());
    }

    #[test]
    fn pairs_follow_fixed_order() {
        let since = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let reading = Reading::new()
            .filter("inbox")
            .summary()
            .after("QVFJ")
            .since(since)
            .limit(25)
            .fields(["id"])
            .fields(vec!["snippet".to_string()]);

        let keys: Vec<_> = reading.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["fields", "limit", "since", "after", "summary", "filter"]);
        assert_eq!(reading.query_pairs()[0].1, "id,snippet");
        assert_eq!(reading.query_pairs()[2].1, "1451606400");
    }
}
