// Naming Rules
//
// Derivation of table and column names from Rust identifiers, and parsing of
// the per-field `orm` tag.

use std::collections::HashMap;

use crate::common::error::{OrmError, OrmResult};

/// Tag key that overrides a field's column name
pub const TAG_KEY_COLUMN: &str = "column";

/// Convert a camel or Pascal case identifier to snake case.
///
/// An underscore is inserted before every uppercase letter except the first
/// character; other characters pass through unchanged.
pub fn underscore_name(name: &str) -> String {
    let mut buf = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                buf.push('_');
            }
            buf.extend(ch.to_lowercase());
        } else {
            buf.push(ch);
        }
    }
    buf
}

/// Parse an `orm` tag such as `column=id,xx=bb` into key/value pairs.
///
/// Every comma separated pair must contain exactly one `=`; an empty value is
/// allowed and left to the caller to interpret.
pub fn parse_tag(raw: &str) -> OrmResult<HashMap<String, String>> {
    let pairs: Vec<&str> = raw.split(',').collect();
    let mut res = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        let segs: Vec<&str> = pair.split('=').collect();
        if segs.len() != 2 {
            return Err(OrmError::InvalidTagContent(pair.to_string()));
        }
        res.insert(segs[0].to_string(), segs[1].to_string());
    }
    Ok(res)
}

/// Resolve the column for a field: a non-empty `column=` tag wins, anything
/// else falls back to the snake case of the field name.
pub fn column_name(field: &str, tag: Option<&str>) -> OrmResult<String> {
    let explicit = match tag {
        Some(raw) => parse_tag(raw)?.remove(TAG_KEY_COLUMN),
        None => None,
    };
    Ok(match explicit {
        Some(col) if !col.is_empty() => col,
        _ => underscore_name(field),
    })
}
