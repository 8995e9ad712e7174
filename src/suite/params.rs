use crate::request::options::PathParams;
use crate::request::target::Target;

/// Replace `:name` placeholders in `path` with values from `params`.
///
/// A placeholder is a segment that follows a `/` and starts with `:`; its
/// name is the rest of the segment. Placeholders without a value are kept
/// verbatim. Anything after the first `?` or `#` is left untouched.
pub fn substitute_path_params(path: &str, params: &PathParams) -> String {
    let split = path.find(['?', '#']).unwrap_or(path.len());
    let (pathname, rest) = path.split_at(split);

    let mut out = String::with_capacity(path.len());
    for (i, segment) in pathname.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }
        let value = segment
            .strip_prefix(':')
            .filter(|name| i > 0 && !name.is_empty())
            .and_then(|name| params.get(name));
        out.push_str(value.map_or(segment, String::as_str));
    }
    out.push_str(rest);
    out
}

/// Apply [`substitute_path_params`] to the path of a target.
pub(crate) fn substitute_target(target: &Target, params: &PathParams) -> Target {
    if params.is_empty() {
        return target.clone();
    }
    match target {
        Target::Path(path) => Target::Path(substitute_path_params(path, params)),
        Target::Url(url) => {
            let mut url = url.clone();
            let path = substitute_path_params(url.path(), params);
            url.set_path(&path);
            Target::Url(url)
        }
    }
}
