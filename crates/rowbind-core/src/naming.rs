//! Name Deriver: type name to table name
//!
//! A type name is split into capitalized word segments (an upper-case
//! ASCII letter followed by any lower-case letters and digits). Each
//! segment is lower-cased and the segments are joined with underscores.
//! Characters outside a segment are dropped.

use crate::errors::{Result, RowbindError};

/// Derive the canonical table name for a type name.
///
/// # Errors
///
/// `Naming` if no segment can be derived from the name, for example when it
/// contains no uppercase ASCII letter.
///
/// ```
/// use rowbind_core::naming::table_name;
///
/// assert_eq!(table_name("WebPage").unwrap(), "web_page");
/// ```
pub fn table_name(type_name: &str) -> Result<String> {
    let segments = segments(type_name);
    if segments.is_empty() {
        return Err(RowbindError::Naming {
            type_name: type_name.to_string(),
        });
    }
    Ok(segments.join("_"))
}

fn segments(type_name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Option<String> = None;

    for c in type_name.chars() {
        if c.is_ascii_uppercase() {
            out.extend(current.take());
            current = Some(c.to_ascii_lowercase().to_string());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if let Some(segment) = current.as_mut() {
                segment.push(c);
            }
        } else {
            out.extend(current.take());
        }
    }
    out.extend(current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        assert_eq!(table_name("Page").unwrap(), "page");
    }

    #[test]
    fn test_multi_word() {
        assert_eq!(table_name("HogeMoge").unwrap(), "hoge_moge");
        assert_eq!(table_name("WebPageVisit").unwrap(), "web_page_visit");
    }

    #[test]
    fn test_digits_stay_in_segment() {
        assert_eq!(table_name("Web2Page").unwrap(), "web2_page");
    }

    #[test]
    fn test_acronym_splits_per_letter() {
        assert_eq!(table_name("HTTPLog").unwrap(), "h_t_t_p_log");
    }

    #[test]
    fn test_leading_lowercase_is_dropped() {
        assert_eq!(table_name("myPage").unwrap(), "page");
    }

    #[test]
    fn test_underscore_breaks_segment() {
        assert_eq!(table_name("Web_page").unwrap(), "web");
    }

    #[test]
    fn test_no_segments() {
        for name in ["", "page", "web_page", "123"] {
            let err = table_name(name).unwrap_err();
            assert!(matches!(err, RowbindError::Naming { .. }), "{:?}", name);
        }
    }
}
