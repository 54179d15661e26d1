//! OData query options for Graph collection requests

/// Ordered list of `$`-prefixed query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.pairs.push((key.to_string(), value.into()));
        self
    }

    pub fn top(self, n: u32) -> Self {
        self.with("$top", n.to_string())
    }

    pub fn select(self, fields: &[&str]) -> Self {
        self.with("$select", fields.join(","))
    }

    pub fn filter(self, expr: impl Into<String>) -> Self {
        self.with("$filter", expr)
    }

    pub fn order_by(self, expr: impl Into<String>) -> Self {
        self.with("$orderby", expr)
    }

    pub fn expand(self, expr: impl Into<String>) -> Self {
        self.with("$expand", expr)
    }

    /// Plain (non-OData) parameter such as `startDateTime`.
    pub fn param(self, key: &str, value: impl Into<String>) -> Self {
        self.with(key, value)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Quote a string literal for use inside `$filter`.
pub fn odata_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
