use crate::base::error::FetchError;
use std::fmt;
use url::Url;

/// Where a fetch goes: an absolute URL or a path resolved against the
/// client's default origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Path(String),
    Url(Url),
}

impl Target {
    /// Resolve to an absolute URL.
    ///
    /// A path that parses as an absolute URL is used as-is. Anything else
    /// needs `origin`; a leading `/` is added when missing.
    pub fn resolve(&self, origin: Option<&str>) -> Result<Url, FetchError> {
        let path = match self {
            Target::Url(url) => return Ok(url.clone()),
            Target::Path(path) => path,
        };
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        let origin = origin.ok_or(FetchError::MissingOrigin)?;
        let joined = if path.starts_with('/') {
            format!("{origin}{path}")
        } else {
            format!("{origin}/{path}")
        };
        Url::parse(&joined).map_err(|_| FetchError::InvalidUrl(joined))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Path(path) => f.write_str(path),
            Target::Url(url) => f.write_str(url.as_str()),
        }
    }
}

impl From<&str> for Target {
    fn from(path: &str) -> Self {
        Target::Path(path.to_owned())
    }
}

impl From<String> for Target {
    fn from(path: String) -> Self {
        Target::Path(path)
    }
}

impl From<&String> for Target {
    fn from(path: &String) -> Self {
        Target::Path(path.clone())
    }
}

impl From<Url> for Target {
    fn from(url: Url) -> Self {
        Target::Url(url)
    }
}

impl From<&Url> for Target {
    fn from(url: &Url) -> Self {
        Target::Url(url.clone())
    }
}
