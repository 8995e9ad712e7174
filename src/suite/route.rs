use serde::de::DeserializeOwned;

/// A statically declared endpoint.
///
/// # Example
///
/// ```rust,ignore
/// struct GetUser;
///
/// impl Route for GetUser {
///     const METHOD: &'static str = "GET";
///     const PATH: &'static str = "/users/:id";
///     type Response = User;
/// }
///
/// let user = suite.send::<GetUser>(FetchOptions::new().param("id", 1)).await?;
/// ```
pub trait Route {
    /// Request method; case-insensitive.
    const METHOD: &'static str;
    /// Path relative to the suite base path; may contain `:name` placeholders.
    const PATH: &'static str;
    /// Decoded response body.
    type Response: DeserializeOwned;
}
