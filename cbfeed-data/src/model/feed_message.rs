use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Display;

use super::FeedEvent;

pub const TICKER_SEPARATOR: &str = ">>>";
pub const HEARTBEAT_MARKER: &str = "<3 heartbeat";

/*----- */
// Feed message
/*----- */
// Inbound feed payloads stay untyped. Only the "type" field is inspected to
// pick how the message is printed; every other field is carried as received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub enum FeedMessage {
    Ticker(Map<String, Value>),
    Heartbeat(Map<String, Value>),
    Other(Map<String, Value>),
}

impl From<Map<String, Value>> for FeedMessage {
    fn from(fields: Map<String, Value>) -> Self {
        match fields.get("type").and_then(Value::as_str) {
            Some("ticker") => FeedMessage::Ticker(fields),
            Some("heartbeat") => FeedMessage::Heartbeat(fields),
            _ => FeedMessage::Other(fields),
        }
    }
}

impl FeedMessage {
    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            FeedMessage::Ticker(fields)
            | FeedMessage::Heartbeat(fields)
            | FeedMessage::Other(fields) => fields,
        }
    }
}

impl FeedEvent for FeedMessage {
    fn kind(&self) -> &str {
        self.fields()
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }

    fn product_id(&self) -> Option<&str> {
        self.fields().get("product_id").and_then(Value::as_str)
    }

    // Exchange timestamp, when "time" is present and RFC 3339
    fn exchange_time(&self) -> Option<DateTime<Utc>> {
        self.fields()
            .get("time")
            .and_then(Value::as_str)
            .and_then(|time| DateTime::parse_from_rfc3339(time).ok())
            .map(|time| time.with_timezone(&Utc))
    }
}

// Strings print bare, anything else as JSON and a missing field as null
fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
        None => Value::Null.to_string(),
    }
}

impl Display for FeedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedMessage::Ticker(fields) => write!(
                f,
                "{} {} {}",
                field_text(fields, "time"),
                TICKER_SEPARATOR,
                field_text(fields, "price")
            ),
            FeedMessage::Heartbeat(fields) => {
                write!(f, "{} {}", field_text(fields, "time"), HEARTBEAT_MARKER)
            }
            FeedMessage::Other(fields) => write!(f, "{}", Value::Object(fields.clone())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn de(payload: &str) -> FeedMessage {
        serde_json::from_str::<FeedMessage>(payload).unwrap()
    }

    #[test]
    fn test_ticker_prints_time_and_price_only() {
        let message = de(r#"{
            "type":"ticker",
            "sequence":37475248783,
            "product_id":"BTC-USD",
            "price":"65000.00",
            "best_bid":"64999.99",
            "time":"2024-06-30T00:00:00Z"
        }"#);

        assert!(matches!(message, FeedMessage::Ticker(_)));
        assert_eq!(message.to_string(), "2024-06-30T00:00:00Z >>> 65000.00");
        assert_eq!(message.product_id(), Some("BTC-USD"));
    }

    #[test]
    fn test_ticker_with_missing_price() {
        let message = de(r#"{"type":"ticker","time":"2024-06-30T00:00:00Z"}"#);
        assert_eq!(message.to_string(), "2024-06-30T00:00:00Z >>> null");
    }

    #[test]
    fn test_heartbeat_prints_time_and_marker() {
        let message = de(r#"{
            "type":"heartbeat",
            "sequence":90,
            "last_trade_id":20,
            "product_id":"BTC-USD",
            "time":"2024-06-30T00:00:01.000000Z"
        }"#);

        assert!(matches!(message, FeedMessage::Heartbeat(_)));
        assert_eq!(message.to_string(), "2024-06-30T00:00:01.000000Z <3 heartbeat");
    }

    #[test]
    fn test_unknown_type_prints_raw_message() {
        let payload = r#"{"type":"subscriptions","channels":[{"name":"ticker","product_ids":["BTC-USD"]}]}"#;
        let message = de(payload);

        assert!(matches!(message, FeedMessage::Other(_)));
        assert_eq!(message.to_string(), payload);
    }

    #[test]
    fn test_missing_or_non_string_type_is_other() {
        let missing = de(r#"{"price":"1.00"}"#);
        let numeric = de(r#"{"type":7}"#);

        assert!(matches!(missing, FeedMessage::Other(_)));
        assert!(matches!(numeric, FeedMessage::Other(_)));
        assert_eq!(missing.kind(), "unknown");
        assert_eq!(missing.to_string(), r#"{"price":"1.00"}"#);
    }

    #[test]
    fn test_exchange_time() {
        let message = de(r#"{"type":"ticker","time":"2024-06-30T00:00:00Z","price":"1"}"#);
        assert_eq!(
            message.exchange_time(),
            Some(Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap())
        );

        let message = de(r#"{"type":"ticker","time":"yesterday"}"#);
        assert_eq!(message.exchange_time(), None);
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(serde_json::from_str::<FeedMessage>(r#"["ticker"]"#).is_err());
    }
}
