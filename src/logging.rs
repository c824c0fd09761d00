/// Structured logging helpers
///
/// Transfer milestones are logged as one JSON object per line so a session
/// can be replayed from the log alone.

use serde_json::{json, Value};

/// Current timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Structured log event builder
///
/// Usage:
/// ```
/// use transfer_otp::logging::LogEvent;
///
/// let log_value = LogEvent::new("TRANSFER_SETTLED")
///     .field("target_account", "1234567890")
///     .field("amount", 500000)
///     .build();
///
/// log::info!("{}", log_value);
/// ```
pub struct LogEvent {
    fields: serde_json::Map<String, Value>,
}

impl LogEvent {
    /// Create a new log event with the given event name
    pub fn new(event: &str) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("event".to_string(), json!(event));
        fields.insert("timestamp_ms".to_string(), json!(now_ms()));

        Self { fields }
    }

    /// Add a field to the log event
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Build the final JSON value
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

#[macro_export]
macro_rules! log_otp_issued {
    ($target_account:expr, $amount:expr, $attempts:expr) => {
        log::info!(
            "{}",
            $crate::logging::LogEvent::new("OTP_ISSUED")
                .field("target_account", $target_account)
                .field("amount", $amount)
                .field("attempts_remaining", $attempts)
                .build()
        );
    };
}

#[macro_export]
macro_rules! log_transfer_settled {
    ($target_account:expr, $amount:expr, $balance_before:expr, $balance_after:expr) => {
        log::info!(
            "{}",
            $crate::logging::LogEvent::new("TRANSFER_SETTLED")
                .field("target_account", $target_account)
                .field("amount", $amount)
                .field("balance_before", $balance_before)
                .field("balance_after", $balance_after)
                .build()
        );
    };
}

#[macro_export]
macro_rules! log_transfer_cancelled {
    ($reason:expr) => {
        log::warn!(
            "{}",
            $crate::logging::LogEvent::new("TRANSFER_CANCELLED")
                .field("reason", $reason)
                .build()
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_builder() {
        let log = LogEvent::new("TEST_EVENT")
            .field("target_account", "1234567890")
            .field("amount", 1000000)
            .build();

        assert_eq!(log["event"], "TEST_EVENT");
        assert_eq!(log["target_account"], "1234567890");
        assert_eq!(log["amount"], 1000000);
        assert!(log.get("timestamp_ms").is_some());
    }

    #[test]
    fn test_later_field_overwrites() {
        let log = LogEvent::new("E").field("k", 1).field("k", 2).build();
        assert_eq!(log["k"], 2);
    }
}
