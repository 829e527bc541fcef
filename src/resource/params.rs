//! Creation parameters from the request query string
//!
//! Create operations take flat scalar fields as individually named query
//! parameters. Values are percent-decoded; typed accessors parse through
//! `FromStr`, so dates come from ISO-8601, booleans from literal
//! true/false, and numbers from decimal.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::resource::ApiError;

#[derive(Debug, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut values = HashMap::new();

        if let Some(q) = query {
            for pair in q.split('&') {
                if let Some((key, value)) = pair.split_once('=') {
                    let value = urlencoding::decode(value).unwrap_or_default();
                    values.insert(key.to_string(), value.into_owned());
                }
            }
        }

        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Required string parameter, as-is
    pub fn require_str(&self, name: &str) -> Result<String, ApiError> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| missing(name))
    }

    /// Required parameter parsed to a typed value
    pub fn require<T: FromStr>(&self, name: &str) -> Result<T, ApiError>
    where
        T::Err: Display,
    {
        let raw = self.get(name).ok_or_else(|| missing(name))?;
        raw.parse().map_err(|e| {
            ApiError::validation(format!("Invalid value for parameter '{}': {}", name, e))
        })
    }
}

fn missing(name: &str) -> ApiError {
    ApiError::validation(format!("Missing required parameter '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_percent_decoding() {
        let params = Params::from_query(Some("email=a%40b.edu&teamId=t1"));
        assert_eq!(params.get("email"), Some("a@b.edu"));
        assert_eq!(params.get("teamId"), Some("t1"));
    }

    #[test]
    fn test_typed_parsing() {
        let params = Params::from_query(Some(
            "solved=false&stars=3&requestTime=2022-01-03T00%3A00%3A00",
        ));
        assert!(!params.require::<bool>("solved").unwrap());
        assert_eq!(params.require::<i32>("stars").unwrap(), 3);

        let when: NaiveDateTime = params.require("requestTime").unwrap();
        assert_eq!(when.to_string(), "2022-01-03 00:00:00");
    }

    #[test]
    fn test_missing_parameter() {
        let params = Params::from_query(None);
        let err = params.require_str("title").unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter 'title'");
    }

    #[test]
    fn test_unparsable_value() {
        let params = Params::from_query(Some("solved=yes"));
        assert!(params.require::<bool>("solved").is_err());
    }

    #[test]
    fn test_unparsable_date() {
        let params = Params::from_query(Some("requestTime=January+3rd"));
        assert!(params.require::<NaiveDateTime>("requestTime").is_err());
    }
}
