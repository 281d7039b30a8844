use crate::errors::TagError;

/// Split a record name into its delimited fields.
///
/// Pure and order-preserving; empty fields between consecutive delimiters are
/// kept as empty strings, so `split_name("a::b", ':')` yields
/// `["a", "", "b"]`.
pub fn split_name(name: &str, delim: char) -> Vec<String> {
    name.split(delim).map(str::to_string).collect()
}

/// Join fields with `joiner` appended after every field, including the last.
///
/// The trailing delimiter is intentional: downstream consumers of the trimmed
/// identifier expect it, so it must be preserved bit-for-bit.
pub fn join_fields(fields: &[String], joiner: &str) -> String {
    let mut out = String::with_capacity(
        fields.iter().map(String::len).sum::<usize>() + fields.len() * joiner.len(),
    );
    for field in fields {
        out.push_str(field);
        out.push_str(joiner);
    }
    out
}

/// Drop exactly the final field, which is assumed to hold raw sequence data
/// appended by the upstream producer rather than identity information.
///
/// Trimming an empty field sequence is a fatal malformed-record error; it
/// must never silently produce an empty result.
pub fn trim_last(mut fields: Vec<String>, name: &str) -> Result<Vec<String>, TagError> {
    if fields.pop().is_none() {
        return Err(TagError::MalformedRecord {
            name: name.to_string(),
            reason: "cannot trim the last field of an empty field sequence".to_string(),
        });
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_name_basic() {
        assert_eq!(split_name("a:b:c", ':'), owned(&["a", "b", "c"]));
    }

    #[test]
    fn test_split_name_preserves_empty_fields() {
        assert_eq!(split_name("a::b", ':'), owned(&["a", "", "b"]));
        assert_eq!(split_name(":a:", ':'), owned(&["", "a", ""]));
    }

    #[test]
    fn test_split_name_other_delimiter() {
        assert_eq!(split_name("a_b_c", '_'), owned(&["a", "b", "c"]));
    }

    #[test]
    fn test_join_fields_keeps_trailing_delimiter() {
        assert_eq!(join_fields(&owned(&["a", "b", "c"]), ":"), "a:b:c:");
        assert_eq!(join_fields(&owned(&["a"]), ":"), "a:");
        assert_eq!(join_fields(&[], ":"), "");
    }

    #[test]
    fn test_trim_last_drops_final_field() {
        assert_eq!(
            trim_last(owned(&["a", "b", "c"]), "rec").unwrap(),
            owned(&["a", "b"])
        );
        assert_eq!(trim_last(owned(&["a"]), "rec").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_trim_last_empty_is_fatal() {
        let err = trim_last(Vec::new(), "rec").unwrap_err();
        assert!(matches!(err, TagError::MalformedRecord { .. }));
    }
}
