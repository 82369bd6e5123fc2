use crate::ds::error::PropertyError;

pub const GET_GETTER: &str = "get";
pub const IS_GETTER: &str = "is";
pub const SETTER: &str = "set";

/// Split a path at its first `.` into a head segment and the remainder,
/// both trimmed.
///
/// `"child.name"` gives `("child", Some("name"))`, `"name"` gives
/// `("name", None)`.
pub fn split_head(path: &str) -> Result<(&str, Option<&str>), PropertyError> {
    let path = path.trim();
    let (head, rest) = match path.find('.') {
        Some(idx) => (path[..idx].trim(), Some(path[idx + 1..].trim())),
        None => (path, None),
    };
    check_segment(path, head)?;
    if let Some(rest) = rest {
        if rest.is_empty() {
            return Err(PropertyError::invalid_path(path, "trailing '.'"));
        }
    }
    Ok((head, rest))
}

/// Check that no segment of `path` is empty once trimmed.
pub fn validate_path(path: &str) -> Result<(), PropertyError> {
    let path = path.trim();
    path.split('.')
        .try_for_each(|segment| check_segment(path, segment.trim()))
}

pub fn check_segment(path: &str, segment: &str) -> Result<(), PropertyError> {
    if segment.is_empty() {
        return Err(PropertyError::invalid_path(path, "empty segment"));
    }
    Ok(())
}

/// `("get", "name")` gives `"getName"`.
pub fn to_accessor_name(prefix: &str, property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => {
            let mut name = String::with_capacity(prefix.len() + property.len());
            name.push_str(prefix);
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
            name
        }
        None => prefix.to_string(),
    }
}
