use serde::{Deserialize, Serialize};

/// Body of `GET oauth/v1/generate?grant_type=client_credentials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Lifetime in seconds. The gateway sends it as a string.
    #[serde(default)]
    pub expires_in: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parsing() {
        let resp: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"c9SQxWWhmdVRlyh0zh8gZDTkubVF","expires_in":"3599"}"#)
                .unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("c9SQxWWhmdVRlyh0zh8gZDTkubVF"));
        assert_eq!(resp.expires_in.as_deref(), Some("3599"));

        let empty: AccessTokenResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.access_token.is_none());
    }
}
