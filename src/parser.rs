//! JSON decoding of the comments payload.

use crate::error::FetchError;
use crate::model::RawComment;

/// Decodes a JSON array of comment objects.
///
/// Unknown object keys are ignored and missing ones are left as `None`;
/// schema validation happens at enrichment.
///
/// # Errors
///
/// Returns [`FetchError::MalformedPayload`] if the bytes are not a JSON array
/// of objects, or if the array is empty.
pub fn parse_comments(bytes: &[u8]) -> Result<Vec<RawComment>, FetchError> {
    let comments: Vec<RawComment> =
        serde_json::from_slice(bytes).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    if comments.is_empty() {
        return Err(FetchError::MalformedPayload(
            "payload is an empty array".to_string(),
        ));
    }

    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_array() {
        let bytes = br#"[
            {"postId": 1, "id": 1, "name": "id labore ex et quam laborum",
             "email": "Eliseo@gardner.biz", "body": "laudantium enim quasi"},
            {"postId": 1, "id": 2, "name": "quo vero reiciendis",
             "email": "Jayne_Kuhic@sydney.com", "body": "est natus enim"}
        ]"#;

        let comments = parse_comments(bytes).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].email.as_deref(), Some("Jayne_Kuhic@sydney.com"));
        assert_eq!(comments[0].post_id, Some(1));
    }

    #[test]
    fn test_parse_tolerates_missing_and_extra_keys() {
        let bytes = br#"[{"id": 9, "email": "x@y.z", "extra": true}]"#;
        let comments = parse_comments(bytes).unwrap();
        assert_eq!(comments[0].id, Some(9));
        assert!(comments[0].body.is_none());
    }

    #[test]
    fn test_parse_empty_array_is_malformed() {
        assert!(matches!(
            parse_comments(b"[]"),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_object_is_malformed() {
        assert!(matches!(
            parse_comments(br#"{"comments": []}"#),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_comments(b"<html>oops</html>"),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_wrong_field_type_is_malformed() {
        assert!(matches!(
            parse_comments(br#"[{"id": "one"}]"#),
            Err(FetchError::MalformedPayload(_))
        ));
    }
}
