//! Signup-confirmation events delivered by the identity provider.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Trigger source of a confirmed signup; every other source is passed through.
pub const SIGNUP_CONFIRMED: &str = "PostConfirmation_ConfirmSignUp";

/// Display-name attributes, highest priority first.
const NAME_ATTRIBUTES: [&str; 3] = ["name", "preferred_username", "given_name"];

/// Typed view of the fields the signup hook reads. The raw event is echoed
/// back to the identity provider untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupEvent {
    #[serde(default)]
    pub trigger_source: String,
    #[serde(default)]
    pub request: Option<SignupRequest>,
}

/// Attribute values are kept as raw JSON; only string values are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub user_attributes: HashMap<String, Value>,
}

impl SignupEvent {
    pub fn is_signup_confirmed(&self) -> bool {
        self.trigger_source == SIGNUP_CONFIRMED
    }

    /// Subject claim, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.attribute("sub")
    }

    pub fn email(&self) -> Option<&str> {
        self.attribute("email")
    }

    /// First non-empty display-name candidate, or "".
    pub fn display_name(&self) -> &str {
        NAME_ATTRIBUTES
            .iter()
            .find_map(|key| self.attribute(key))
            .unwrap_or("")
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.request
            .as_ref()?
            .user_attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_event() {
        let event: SignupEvent = serde_json::from_value(json!({
            "triggerSource": "SomethingElse"
        }))
        .unwrap();

        assert!(!event.is_signup_confirmed());
        assert_eq!(event.subject(), None);
    }

    #[test]
    fn display_name_priority() {
        let event: SignupEvent = serde_json::from_value(json!({
            "triggerSource": SIGNUP_CONFIRMED,
            "request": {
                "userAttributes": {
                    "sub": "123",
                    "name": "",
                    "preferred_username": "ada_l",
                    "given_name": "Ada"
                }
            }
        }))
        .unwrap();

        assert!(event.is_signup_confirmed());
        assert_eq!(event.subject(), Some("123"));
        assert_eq!(event.display_name(), "ada_l");
    }

    #[test]
    fn display_name_defaults_to_empty() {
        let event = SignupEvent::default();
        assert_eq!(event.display_name(), "");
    }

    #[test]
    fn tolerates_null_request_and_non_string_attributes() {
        let event: SignupEvent = serde_json::from_value(json!({
            "triggerSource": "PreSignUp_SignUp",
            "request": null
        }))
        .unwrap();
        assert_eq!(event.subject(), None);

        let event: SignupEvent = serde_json::from_value(json!({
            "triggerSource": SIGNUP_CONFIRMED,
            "request": {
                "userAttributes": {
                    "sub": "123",
                    "email_verified": true,
                    "email": 42
                }
            }
        }))
        .unwrap();
        assert_eq!(event.subject(), Some("123"));
        assert_eq!(event.email(), None);
    }
}
