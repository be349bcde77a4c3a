//! Unit tests for SMS module

mod mock_sms_tests;
mod rate_limited_tests;
#[cfg(feature = "twilio-sms")]
mod twilio_tests;
