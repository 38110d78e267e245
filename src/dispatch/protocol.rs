//! Wire format of the command endpoint.
//!
//! Request:
//!
//! ```json
//! { "auth": "<token>", "aktion": "benutzer-loeschen", "daten": ["a@b.com"] }
//! ```
//!
//! Reply, tagged by `status`:
//!
//! ```json
//! { "status": "ok", "role": "admin", "data": { "benutzer": { "spalten": [], "daten": {} } } }
//! { "status": "error", "code": 0, "text": "Fehler bei Authentifizierung" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Snapshot;

/// Body of a command request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRequest<'a> {
    /// Session token.
    pub auth: &'a str,
    /// Action name.
    pub aktion: &'a str,
    /// Positional arguments.
    pub daten: &'a [String],
}

/// Backend error code, sent either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Numeric code.
    Number(i64),
    /// Textual code.
    Text(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Payload of an `error` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Message for the operator.
    #[serde(default)]
    pub text: String,
}

/// A decoded reply body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status")]
pub enum ReplyBody {
    /// Full replacement snapshot.
    #[serde(rename = "ok")]
    Ok(Snapshot),
    /// The backend refused the command.
    #[serde(rename = "error")]
    Error(ErrorBody),
}

impl ReplyBody {
    /// Decode a reply; the error string describes why the body is malformed.
    pub fn from_slice(body: &[u8]) -> std::result::Result<Self, String> {
        serde_json::from_slice(body).map_err(|e| e.to_string())
    }
}

/// Render a request body.
pub fn encode_request(auth: &str, action: &str, args: &[String]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&CommandRequest {
        auth,
        aktion: action,
        daten: args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, SectionKey};

    #[test]
    fn test_request_body_shape() {
        let args = vec!["bearbeiter".to_string(), "a@b.com".to_string()];
        let body = encode_request("tok", "benutzer-bearbeite-kontotyp", &args).unwrap();
        insta::assert_snapshot!(
            String::from_utf8(body).unwrap(),
            @r#"{"auth":"tok","aktion":"benutzer-bearbeite-kontotyp","daten":["bearbeiter","a@b.com"]}"#
        );
    }

    #[test]
    fn test_ok_reply() {
        let body = br#"{"status":"ok","role":"admin","data":{"bezirke":{"spalten":["land"],"daten":{"0":["NRW"]}}}}"#;
        let ReplyBody::Ok(snapshot) = ReplyBody::from_slice(body).unwrap() else {
            panic!("expected ok reply");
        };
        assert_eq!(snapshot.role, Role::Admin);
        assert_eq!(snapshot.section(SectionKey::Districts).unwrap().len(), 1);
    }

    #[test]
    fn test_error_reply_numeric_and_text_code() {
        let numeric = ReplyBody::from_slice(br#"{"status":"error","code":0,"text":"nein"}"#).unwrap();
        let textual =
            ReplyBody::from_slice(br#"{"status":"error","code":"E42","text":"nein"}"#).unwrap();

        match (numeric, textual) {
            (ReplyBody::Error(a), ReplyBody::Error(b)) => {
                assert_eq!(a.code.to_string(), "0");
                assert_eq!(b.code.to_string(), "E42");
                assert_eq!(a.text, "nein");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_replies() {
        assert!(ReplyBody::from_slice(b"<html>502</html>").is_err());
        assert!(ReplyBody::from_slice(br#"{"status":"pending"}"#).is_err());
        assert!(ReplyBody::from_slice(br#"{"status":"ok","data":{}}"#).is_err());
        assert!(ReplyBody::from_slice(br#"{"role":"admin","data":{}}"#).is_err());
    }
}
