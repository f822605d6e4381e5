use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub mod group;
pub mod user;

/// Decode a request body regardless of its declared content type.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        log::trace!(target: crate::APP_TARGET, "Rejected payload: {err}");
        ApiError::BadRequest(String::from("Invalid json"))
    })
}

#[cfg(test)]
mod tests {
    use super::parse_json;
    use crate::error::ApiError;

    #[test]
    fn rejects_non_json() {
        let res = parse_json::<Vec<String>>(b"THIS IS NOT VALID JSON");
        assert!(matches!(res, Err(ApiError::BadRequest(ref msg)) if msg == "Invalid json"));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(parse_json::<Vec<String>>(br#"{"users": []}"#).is_err());
        assert_eq!(parse_json::<Vec<String>>(br#"["a", "b"]"#).unwrap(), vec!["a", "b"]);
    }
}
