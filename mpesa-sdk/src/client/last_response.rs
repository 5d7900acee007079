use serde::de::DeserializeOwned;
use serde_json::Value;

/// Raw body of the most recent gateway response.
///
/// Overwritten by every request an [`MpesaClient`](super::MpesaClient)
/// makes, including failed ones, so provider error payloads stay inspectable
/// after an error is returned. Belongs to a single client instance; calls on
/// that instance must be serialized for the captured body to be meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastResponse {
    body: Option<String>,
}

impl LastResponse {
    /// The body exactly as received, if any request has completed.
    pub fn raw(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// The body parsed as JSON.
    pub fn json(&self) -> Option<Result<Value, serde_json::Error>> {
        self.parse()
    }

    /// The body deserialized into a typed response.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.body.as_deref().map(serde_json::from_str)
    }

    pub(crate) fn record(&mut self, body: &str) {
        self.body = Some(body.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::stk_push::StkPushResponse;

    #[test]
    fn test_empty_until_recorded() {
        let last = LastResponse::default();
        assert!(last.raw().is_none());
        assert!(last.json().is_none());
    }

    #[test]
    fn test_raw_and_json_agree() {
        let body = r#"{"MerchantRequestID":"29115-34620561-1","CheckoutRequestID":"ws_CO_191220191020363925","ResponseCode":"0"}"#;
        let mut last = LastResponse::default();
        last.record(body);

        assert_eq!(last.raw(), Some(body));
        let parsed: Value = serde_json::from_str(last.raw().unwrap()).unwrap();
        assert_eq!(last.json().unwrap().unwrap(), parsed);

        let typed: StkPushResponse = last.parse().unwrap().unwrap();
        assert_eq!(typed.response_code.as_deref(), Some("0"));
    }

    #[test]
    fn test_non_json_body() {
        let mut last = LastResponse::default();
        last.record("<html>Bad Gateway</html>");
        assert_eq!(last.raw(), Some("<html>Bad Gateway</html>"));
        assert!(last.json().unwrap().is_err());
    }
}
