use super::AuthRejection;

/// Authorization scheme accepted by the guard, compared case-insensitively.
pub const BEARER_SCHEME: &str = "bearer";

/// Extracts the credential from a raw `Authorization` header value.
///
/// The value must split on single spaces into exactly two non-empty parts,
/// the first being `bearer` in any case.
///
/// # Examples
///
/// ```
/// use liftlog_core::auth::{parse_bearer_header, AuthRejection};
///
/// assert_eq!(parse_bearer_header(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
/// assert_eq!(parse_bearer_header(None), Err(AuthRejection::MissingHeader));
/// assert_eq!(parse_bearer_header(Some("Basic xyz")), Err(AuthRejection::MalformedHeader));
/// ```
pub fn parse_bearer_header(header: Option<&str>) -> Result<&str, AuthRejection> {
    let value = header.ok_or(AuthRejection::MissingHeader)?;
    let parts: Vec<&str> = value.split(' ').collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty() => {
            Ok(*token)
        }
        _ => Err(AuthRejection::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(parse_bearer_header(None), Err(AuthRejection::MissingHeader));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(parse_bearer_header(Some("bearer tok")), Ok("tok"));
        assert_eq!(parse_bearer_header(Some("BEARER tok")), Ok("tok"));
        assert_eq!(parse_bearer_header(Some("BeArEr tok")), Ok("tok"));
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        assert_eq!(
            parse_bearer_header(Some("Basic dXNlcjpwYXNz")),
            Err(AuthRejection::MalformedHeader)
        );
        assert_eq!(
            parse_bearer_header(Some("Bearertok")),
            Err(AuthRejection::MalformedHeader)
        );
    }

    #[test]
    fn part_count_must_be_exactly_two() {
        for value in ["", "Bearer", "Bearer a b", "Bearer  tok", " Bearer tok", "Bearer "] {
            assert_eq!(
                parse_bearer_header(Some(value)),
                Err(AuthRejection::MalformedHeader),
                "header {value:?} should be malformed"
            );
        }
    }
}
