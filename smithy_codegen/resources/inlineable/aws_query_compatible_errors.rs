use http::header::ToStrError;
use http::{HeaderMap, HeaderValue};

const X_AMZN_QUERY_ERROR: &str = "x-amzn-query-error";
const QUERY_COMPATIBLE_ERRORCODE_DELIMITER: char = ';';

fn aws_query_compatible_error_from_header(
    headers: &HeaderMap<HeaderValue>,
) -> Result<Option<&str>, ToStrError> {
    headers
        .get(X_AMZN_QUERY_ERROR)
        .map(|v| v.to_str())
        .transpose()
}

/// Obtains custom error code and error type from the given `headers`.
///
/// Looks up a value for the `X_AMZN_QUERY_ERROR` header and if found, the value should be in the
/// form of `<error code>;<error type>`. The function then splits it into two parts and returns
/// a (error code, error type) as a tuple.
///
/// Any execution path besides the above happy path will yield a `None`.
pub fn parse_aws_query_compatible_error(headers: &HeaderMap<HeaderValue>) -> Option<(&str, &str)> {
    let header_value = match aws_query_compatible_error_from_header(headers) {
        Ok(error) => error?,
        _ => return None,
    };

    header_value
        .find(QUERY_COMPATIBLE_ERRORCODE_DELIMITER)
        .map(|idx| {
            let error_code = &header_value[..idx];
            let error_type = &header_value[idx + 1..];
            (error_code, error_type)
        })
}
