//! Policy tags attached to a proof.

use serde::{Deserialize, Serialize};

use crate::errors::ProofError;

/// Ordered list of string tags, each a label followed by its values.
///
/// Tags are part of the signed pre-image, so their order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Vec<String>>);

impl Tags {
    /// No tags.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Tags built from `(label, value)` pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(label, value)| vec![label.into(), value.into()])
                .collect(),
        )
    }

    /// Appends a `(label, value)` tag.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(vec![label.into(), value.into()]);
        self
    }

    /// Appends a raw tag.
    pub fn push(&mut self, tag: Vec<String>) {
        self.0.push(tag);
    }

    /// First value of the first tag labelled `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|tag| tag.first().is_some_and(|l| l == label))
            .and_then(|tag| tag.get(1))
            .map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Query-string form, `?k1=v1&k2=v2`, or the empty string when there are no tags.
    ///
    /// The query carries exactly one value per label, so any tag that is not a `[label, value]`
    /// pair is rejected rather than truncated.
    pub fn encode_query(&self) -> Result<String, ProofError> {
        if self.0.is_empty() {
            return Ok(String::new());
        }

        let pairs = self
            .0
            .iter()
            .map(|tag| match tag.as_slice() {
                [label, value] => Ok(format!(
                    "{}={}",
                    urlencoding::encode(label),
                    urlencoding::encode(value)
                )),
                _ => Err(ProofError::Malformed(format!(
                    "tag {tag:?} is not a label/value pair"
                ))),
            })
            .collect::<Result<Vec<_>, ProofError>>()?;

        Ok(format!("?{}", pairs.join("&")))
    }

    /// Parses a query string, with or without its leading `?`.
    pub fn decode_query(query: &str) -> Result<Self, ProofError> {
        let query = query.strip_prefix('?').unwrap_or(query);

        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (label, value) = pair.split_once('=').unwrap_or((pair, ""));
                Ok(vec![decode_component(label)?, decode_component(value)?])
            })
            .collect::<Result<Vec<_>, ProofError>>()
            .map(Self)
    }
}

fn decode_component(component: &str) -> Result<String, ProofError> {
    urlencoding::decode(&component.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ProofError::Malformed(format!("query component: {e}")))
}

impl From<Vec<Vec<String>>> for Tags {
    fn from(value: Vec<Vec<String>>) -> Self {
        Self(value)
    }
}

impl From<Tags> for Vec<Vec<String>> {
    fn from(value: Tags) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trip() {
        let tags = Tags::new().with("ref", "abc_123").with("amt", "5000");
        let query = tags.encode_query().unwrap();

        assert_eq!(query, "?ref=abc_123&amt=5000");
        assert_eq!(Tags::decode_query(&query).unwrap(), tags);
        assert_eq!(Tags::decode_query("ref=abc_123&amt=5000").unwrap(), tags);
    }

    #[test]
    fn escapes_reserved_characters() {
        let tags = Tags::new().with("note", "a b&c=d");
        let query = tags.encode_query().unwrap();

        assert_eq!(query, "?note=a%20b%26c%3Dd");
        assert_eq!(Tags::decode_query(&query).unwrap(), tags);
        assert_eq!(Tags::decode_query("?note=a+b").unwrap().get("note"), Some("a b"));
    }

    #[test]
    fn empty_tags_have_no_query() {
        assert_eq!(Tags::new().encode_query().unwrap(), "");
        assert!(Tags::decode_query("").unwrap().is_empty());
        assert!(Tags::decode_query("?").unwrap().is_empty());
    }

    #[test]
    fn tags_without_exactly_one_value_have_no_query() {
        for tag in [vec!["solo"], vec!["e", "a", "b"], vec![]] {
            let mut tags = Tags::new().with("ref", "x");
            tags.push(tag.into_iter().map(String::from).collect());
            assert!(matches!(tags.encode_query(), Err(ProofError::Malformed(_))));
        }
    }

    #[test]
    fn get_returns_the_first_match() {
        let tags = Tags::from_pairs([("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(tags.get("a"), Some("1"));
        assert_eq!(tags.get("b"), Some("2"));
        assert_eq!(tags.get("c"), None);
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let tags = Tags::from_pairs([("k", "v")]);
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"[["k","v"]]"#);
    }
}
