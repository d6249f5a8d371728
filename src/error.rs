//! Error type reported by a polling cycle.
//!
//! [`PollError`] is what the configured error handler receives whenever a cycle
//! fails: the producer returned an error or honoured an abort request, the consumer
//! failed, or something in the cycle panicked.
//!
//! The engine itself never returns errors to callers: `start`/`stop`/`abort`/`restart`
//! are no-ops in states where they do not apply.

use std::any::Any;
use std::fmt::Display;
use std::sync::Arc;

use thiserror::Error;

/// # Errors produced by a single polling cycle.
///
/// A failed cycle never terminates the poller; the error is handed to the
/// error handler and the loop proceeds to its retry wait.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum PollError {
    /// The producer failed to produce a value.
    #[error("produce failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The producer gave up because the cycle's abort signal fired.
    #[error("aborted{}", reason_suffix(.reason))]
    Aborted {
        /// Reason passed to [`Poller::abort`](crate::Poller::abort), if any.
        reason: Option<Arc<str>>,
    },

    /// The consumer failed to handle a produced value.
    #[error("consume failed: {error}")]
    Consume {
        /// The underlying error message.
        error: String,
    },

    /// A producer, data observer, consumer or error handler panicked.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl PollError {
    /// Shorthand for [`PollError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use pollvisor::PollError;
    ///
    /// let err = PollError::fail("connection refused");
    /// assert_eq!(err.to_string(), "produce failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        PollError::Fail {
            error: error.to_string(),
        }
    }

    /// Shorthand for [`PollError::Consume`] from anything printable.
    pub fn consume(error: impl Display) -> Self {
        PollError::Consume {
            error: error.to_string(),
        }
    }

    /// Builds [`PollError::Aborted`] carrying the abort reason.
    pub fn aborted(reason: Option<Arc<str>>) -> Self {
        PollError::Aborted { reason }
    }

    /// Builds [`PollError::Panicked`] from a payload caught with `catch_unwind`.
    pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> Self {
        PollError::Panicked {
            info: panic_info(payload.as_ref()),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::PollError;
    ///
    /// assert_eq!(PollError::fail("boom").as_label(), "poll_failed");
    /// assert_eq!(PollError::aborted(None).as_label(), "poll_aborted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PollError::Fail { .. } => "poll_failed",
            PollError::Aborted { .. } => "poll_aborted",
            PollError::Consume { .. } => "consume_failed",
            PollError::Panicked { .. } => "poll_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PollError::Fail { error } => format!("error: {error}"),
            PollError::Aborted { reason: Some(r) } => format!("aborted: {r}"),
            PollError::Aborted { reason: None } => "aborted".to_string(),
            PollError::Consume { error } => format!("consumer error: {error}"),
            PollError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Indicates whether the cycle ended because of an abort request.
    pub fn is_abort(&self) -> bool {
        matches!(self, PollError::Aborted { .. })
    }
}

fn reason_suffix(reason: &Option<Arc<str>>) -> String {
    reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
}

/// Renders a panic payload (`&str` / `String`) as text.
pub(crate) fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(PollError::fail("x").as_label(), "poll_failed");
        assert_eq!(PollError::consume("x").as_label(), "consume_failed");
        assert_eq!(PollError::aborted(None).as_label(), "poll_aborted");
        assert_eq!(
            PollError::Panicked { info: "x".into() }.as_label(),
            "poll_panicked"
        );
    }

    #[test]
    fn test_aborted_display_includes_reason() {
        assert_eq!(PollError::aborted(Some("bye!".into())).to_string(), "aborted: bye!");
        assert_eq!(PollError::aborted(None).to_string(), "aborted");
        assert!(PollError::aborted(None).is_abort());
        assert!(!PollError::fail("x").is_abort());
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = PollError::panicked(Box::new("boom"));
        assert_eq!(from_str.as_message(), "panic: boom");

        let from_string = PollError::panicked(Box::new(String::from("kaboom")));
        assert_eq!(from_string.to_string(), "panicked: kaboom");

        let opaque = PollError::panicked(Box::new(42_u8));
        assert_eq!(opaque.as_message(), "panic: unknown panic");
    }
}
