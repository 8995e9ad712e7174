//! Structured query parameters.
//!
//! A [`Query`] is merged into the request URL when the request is sent.
//! Pairs already present in the URL are kept; merged pairs are appended
//! after them, so a key given in both places appears twice.

use std::fmt;
use url::Url;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Expanded into one pair per item, in order.
    List(Vec<QueryValue>),
    /// Skipped when merging.
    Null,
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::UInt(n) => write!(f, "{n}"),
            QueryValue::Float(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            QueryValue::Null => f.write_str("null"),
        }
    }
}

macro_rules! query_value_from {
    ($variant:ident: $($ty:ty),+) => {
        $(impl From<$ty> for QueryValue {
            fn from(v: $ty) -> Self {
                QueryValue::$variant(v.into())
            }
        })+
    };
}

query_value_from!(Str: String, &str);
query_value_from!(Int: i8, i16, i32, i64);
query_value_from!(UInt: u8, u16, u32, u64);
query_value_from!(Float: f32, f64);
query_value_from!(Bool: bool);

impl From<usize> for QueryValue {
    fn from(v: usize) -> Self {
        QueryValue::UInt(v as u64)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryValue::Null, Into::into)
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string.
    pub fn parse(encoded: &str) -> Self {
        let encoded = encoded.strip_prefix('?').unwrap_or(encoded);
        let pairs = url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(k, v)| (k.into_owned(), QueryValue::Str(v.into_owned())))
            .collect();
        Self { pairs }
    }

    /// Append a parameter.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The flattened `key=value` pairs that merging produces.
    pub fn to_pairs(&self) -> Vec<(&str, String)> {
        let mut out = Vec::with_capacity(self.pairs.len());
        for (key, value) in &self.pairs {
            match value {
                QueryValue::Null => {}
                QueryValue::List(items) => {
                    out.extend(items.iter().map(|item| (key.as_str(), item.to_string())));
                }
                scalar => out.push((key.as_str(), scalar.to_string())),
            }
        }
        out
    }

    /// Append these parameters to the URL's query string.
    pub fn merge_into(&self, url: &mut Url) {
        let pairs = self.to_pairs();
        if pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(pairs);
    }
}

impl From<&str> for Query {
    fn from(encoded: &str) -> Self {
        Query::parse(encoded)
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
