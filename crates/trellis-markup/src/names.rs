//! Tag-name conventions.

/// Converts a dashed name to upper camel case: `"text-field"` → `"TextField"`.
///
/// The first letter is always capitalized and every letter following a dash
/// is capitalized with the dash dropped. A trailing dash is dropped.
pub fn dashed_to_camel(dashed: &str) -> String {
    let mut out = String::with_capacity(dashed.len());
    let mut upper_next = true;
    for c in dashed.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// `true` if `name` carries qualification separators and must be used verbatim.
pub fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

/// The presumed type name for a tag: qualified names pass through, short
/// dashed or camel-case names are normalized with [`dashed_to_camel`].
pub fn type_name_for_tag(tag: &str) -> String {
    if is_qualified(tag) {
        tag.to_string()
    } else {
        dashed_to_camel(tag)
    }
}
