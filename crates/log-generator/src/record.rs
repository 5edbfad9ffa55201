//! The access-log record type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fields in a [`LogRecord`].
pub const FIELD_COUNT: usize = 24;

/// CloudFront log-field names, in record order.
///
/// Used as the header row of tabular output.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "date",
    "time",
    "x-edge-location",
    "sc-bytes",
    "c-ip",
    "cs-method",
    "cs(Host)",
    "cs-uri-stem",
    "sc-status",
    "cs(Referer)",
    "cs(User-Agent)",
    "cs-uri-query",
    "cs(Cookie)",
    "x-edge-result-type",
    "x-edge-request-id",
    "x-host-header",
    "cs-protocol",
    "cs-bytes",
    "time-taken",
    "x-forwarded-for",
    "ssl-protocol",
    "ssl-cipher",
    "x-edge-response-type",
    "cs-protocol-version",
];

/// One simulated CloudFront edge request.
///
/// Serializes with the PascalCase keys that downstream JSON consumers of
/// these logs already expect (`EdgeLocation`, `IPAddress`, `SSLCipher`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogRecord {
    pub date: String,
    pub time: String,
    pub edge_location: String,
    pub bytes_sent: i64,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    pub method: String,
    pub host: String,
    #[serde(rename = "URI")]
    pub uri: String,
    pub status: u16,
    pub referer: String,
    pub user_agent: String,
    pub query_string: String,
    pub cookie: String,
    pub result_type: String,
    pub request_id: String,
    pub host_header: String,
    pub protocol: String,
    pub bytes_received: i64,
    pub time_taken: f64,
    pub x_forwarded_for: String,
    #[serde(rename = "SSLProtocol")]
    pub ssl_protocol: String,
    #[serde(rename = "SSLCipher")]
    pub ssl_cipher: String,
    pub response_type: String,
    pub request_protocol: String,
}

impl LogRecord {
    /// Render the record as tabular cells, aligned with [`FIELD_NAMES`].
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.edge_location.clone(),
            self.bytes_sent.to_string(),
            self.ip_address.clone(),
            self.method.clone(),
            self.host.clone(),
            self.uri.clone(),
            self.status.to_string(),
            self.referer.clone(),
            self.user_agent.clone(),
            self.query_string.clone(),
            self.cookie.clone(),
            self.result_type.clone(),
            self.request_id.clone(),
            self.host_header.clone(),
            self.protocol.clone(),
            self.bytes_received.to_string(),
            format!("{:.3}", self.time_taken),
            self.x_forwarded_for.clone(),
            self.ssl_protocol.clone(),
            self.ssl_cipher.clone(),
            self.response_type.clone(),
            self.request_protocol.clone(),
        ]
    }

    /// Render the record as the tab-separated line CloudFront writes to its
    /// standard log files.
    pub fn to_tsv(&self) -> String {
        self.to_row().join("\t")
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tsv())
    }
}
