//! Response DTOs for the hosted services API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

/// Greeting returned by the root endpoint (GET /)
///
/// Keys are serialized in PascalCase. `ServiceName` is left out entirely
/// when no worker is known.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointResponse {
    /// Fixed greeting
    pub message: String,
    /// Type name of the running worker variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Local wall-clock time in short form, e.g. "3:07 PM"
    pub current_time: String,
}

impl EndpointResponse {
    /// Creates a greeting stamped with the current local time
    pub fn hello(service_name: Option<&str>) -> Self {
        Self::at(service_name, &Local::now())
    }

    /// Creates a greeting stamped with `now`
    pub fn at<Tz>(service_name: Option<&str>, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            message: "Hello World!".to_string(),
            service_name: service_name.map(str::to_string),
            current_time: short_time(now),
        }
    }
}

/// Formats a time as hour without padding, minutes and AM/PM.
pub fn short_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}
