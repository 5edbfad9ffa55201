//! Record synthesizer.

use crate::record::LogRecord;
use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EDGE_LOCATIONS: &[&str] = &[
    "IAD", "DFW", "LAX", "MIA", "SEA", "LHR", "FRA", "NRT", "SIN", "SYD",
];

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "HEAD"];

const STATUS_CODES: &[u16] = &[
    200, 201, 204, 301, 302, 304, 400, 401, 403, 404, 500, 502, 503,
];

const URI_PATHS: &[&str] = &[
    "/images/",
    "/api/",
    "/static/",
    "/assets/",
    "/videos/",
    "/documents/",
    "/downloads/",
    "/products/",
    "/categories/",
    "/users/",
];

const HOST: &str = "example.cloudfront.net";
const HOST_HEADER: &str = "example.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const PLACEHOLDER: &str = "-";
const RESULT_TYPE: &str = "Hit";
const PROTOCOL: &str = "https";
const SSL_PROTOCOL: &str = "TLSv1.2";
const SSL_CIPHER: &str = "ECDHE-RSA-AES128-GCM-SHA256";
const RESPONSE_TYPE: &str = "text/html";
const REQUEST_PROTOCOL: &str = "HTTP/2.0";

/// Bytes sent are drawn from `[100, 1_048_676)`.
const BYTES_SENT_MIN: i64 = 100;
const BYTES_SENT_SPAN: i64 = 1024 * 1024;

/// Bytes received are drawn from `[100, 1124)`.
const BYTES_RECEIVED_MIN: i64 = 100;
const BYTES_RECEIVED_SPAN: i64 = 1024;

const URI_SUFFIX_LEN: usize = 8;
const REQUEST_ID_LEN: usize = 16;

/// Produces [`LogRecord`]s from its own random source.
pub struct RecordSynthesizer<R = StdRng> {
    rng: R,
}

impl RecordSynthesizer<StdRng> {
    /// Create a synthesizer seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Create a deterministic synthesizer (same seed = same records).
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecordSynthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Access the underlying RNG, e.g. to derive file names from the same
    /// random source as the records.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Synthesize one record for `timestamp`.
    pub fn synthesize(&mut self, timestamp: DateTime<Utc>) -> LogRecord {
        let rng = &mut self.rng;

        LogRecord {
            date: timestamp.format("%Y-%m-%d").to_string(),
            time: timestamp.format("%H:%M:%S").to_string(),
            edge_location: pick(rng, EDGE_LOCATIONS).to_string(),
            bytes_sent: BYTES_SENT_MIN + rng.random_range(0..BYTES_SENT_SPAN),
            ip_address: random_ip(rng),
            method: pick(rng, HTTP_METHODS).to_string(),
            host: HOST.to_string(),
            uri: format!(
                "{}{}",
                pick(rng, URI_PATHS),
                random_alphanumeric(rng, URI_SUFFIX_LEN)
            ),
            status: *pick(rng, STATUS_CODES),
            referer: PLACEHOLDER.to_string(),
            user_agent: USER_AGENT.to_string(),
            query_string: PLACEHOLDER.to_string(),
            cookie: PLACEHOLDER.to_string(),
            result_type: RESULT_TYPE.to_string(),
            request_id: random_alphanumeric(rng, REQUEST_ID_LEN),
            host_header: HOST_HEADER.to_string(),
            protocol: PROTOCOL.to_string(),
            bytes_received: BYTES_RECEIVED_MIN + rng.random_range(0..BYTES_RECEIVED_SPAN),
            time_taken: f64::from(rng.random_range(0..1000u32)) / 1000.0,
            x_forwarded_for: PLACEHOLDER.to_string(),
            ssl_protocol: SSL_PROTOCOL.to_string(),
            ssl_cipher: SSL_CIPHER.to_string(),
            response_type: RESPONSE_TYPE.to_string(),
            request_protocol: REQUEST_PROTOCOL.to_string(),
        }
    }
}

/// Uniform pick from a non-empty constant table.
fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Generate a random string of `len` characters from `[a-zA-Z0-9]`.
pub fn random_alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Generate a dotted-quad IPv4 address with four uniform octets.
pub fn random_ip<R: Rng>(rng: &mut R) -> String {
    let octets: [u8; 4] = rng.random();
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}
