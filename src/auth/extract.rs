/// Request credential extraction
///
/// Pulls the presented token out of the `Authorization` header. The header
/// value must split on whitespace into exactly `<scheme> <token>`.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::HeaderError;

pub const BEARER_SCHEME: &str = "Bearer";
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, HeaderError> {
    extract_scheme(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, HeaderError> {
    extract_scheme(headers, API_KEY_SCHEME)
}

fn extract_scheme(headers: &HeaderMap, scheme: &str) -> Result<String, HeaderError> {
    let mut values = headers.get_all(AUTHORIZATION);
    let value = values.next().ok_or(HeaderError::MissingAuthHeader)?;
    if values.next().is_some() {
        return Err(HeaderError::MalformedAuthHeader);
    }

    let value = value
        .to_str()
        .map_err(|_| HeaderError::MalformedAuthHeader)?;

    match value.split_whitespace().collect::<Vec<_>>().as_slice() {
        [found, token] if *found == scheme => Ok((*token).to_string()),
        [_, _] => Err(HeaderError::WrongScheme),
        _ => Err(HeaderError::MalformedAuthHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(values: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(AUTHORIZATION, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(
            extract_bearer(&headers(&["Bearer abc123"])),
            Ok("abc123".to_string())
        );
    }

    #[test]
    fn test_repeated_spaces_collapse() {
        assert_eq!(
            extract_bearer(&headers(&["Bearer     abc"])),
            Ok("abc".to_string())
        );
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer abc123"),
        );

        assert_eq!(extract_bearer(&map), Ok("abc123".to_string()));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            extract_bearer(&HeaderMap::new()),
            Err(HeaderError::MissingAuthHeader)
        );
        assert_eq!(
            extract_api_key(&HeaderMap::new()),
            Err(HeaderError::MissingAuthHeader)
        );
    }

    #[test]
    fn test_too_many_fields() {
        assert_eq!(
            extract_bearer(&headers(&["Bearer  a   b"])),
            Err(HeaderError::MalformedAuthHeader)
        );
    }

    #[test]
    fn test_too_few_fields() {
        for value in ["Bearer", "", "   "] {
            assert_eq!(
                extract_bearer(&headers(&[value])),
                Err(HeaderError::MalformedAuthHeader),
                "value: {:?}",
                value
            );
        }
    }

    #[test]
    fn test_multiple_authorization_headers() {
        assert_eq!(
            extract_bearer(&headers(&["Bearer abc", "Bearer def"])),
            Err(HeaderError::MalformedAuthHeader)
        );
    }

    #[test]
    fn test_wrong_scheme() {
        let map = headers(&["ApiKey xyz"]);

        assert_eq!(extract_bearer(&map), Err(HeaderError::WrongScheme));
        assert_eq!(extract_api_key(&map), Ok("xyz".to_string()));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert_eq!(
            extract_bearer(&headers(&["bearer abc"])),
            Err(HeaderError::WrongScheme)
        );
        assert_eq!(
            extract_api_key(&headers(&["Bearer xyz"])),
            Err(HeaderError::WrongScheme)
        );
    }
}
