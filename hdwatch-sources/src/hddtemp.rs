//! hddtemp daemon reader.
//!
//! The daemon answers every TCP connection with a single `|`-delimited
//! record stream and then closes the socket:
//!
//! ```text
//! |/dev/sda|ST3500418AS|38|C||/dev/sdb|WDC WD10EARS|SLP|*|
//! ```
//!
//! Each drive occupies five fields: an empty separator, the device, the
//! model, the temperature and the unit. Sleeping or unsupported drives
//! report a non-numeric temperature and are skipped.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::{Source, SourceError};

/// Fields per drive record in the daemon's response.
const FIELDS_PER_RECORD: usize = 5;

/// One drive's reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveTemperature {
    /// Device path, e.g. `/dev/sda`.
    pub device: String,
    /// Make/model string reported by the drive.
    pub model: String,
    /// Temperature in degrees Celsius.
    pub celsius: f64,
}

/// Reads drive temperatures from an hddtemp daemon.
#[derive(Debug, Clone)]
pub struct HddtempSource {
    host: String,
    port: u16,
    timeout: Duration,
    description: String,
}

impl HddtempSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HddtempSourceBuilder {
        HddtempSourceBuilder::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect and read until the daemon closes the connection.
    async fn read_response(&self) -> Result<String, SourceError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| SourceError::Connection(format!("{}: {}", self.description, e)))?;

        let mut buf = Vec::with_capacity(1024);
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|e| SourceError::Connection(format!("{}: {}", self.description, e)))?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl Source for HddtempSource {
    type Reading = DriveTemperature;

    async fn fetch(&self) -> Result<Vec<DriveTemperature>, SourceError> {
        let response = tokio::time::timeout(self.timeout, self.read_response())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))??;

        Ok(parse_hddtemp(&response))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HddtempSource`].
#[derive(Debug, Default)]
pub struct HddtempSourceBuilder {
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
}

impl HddtempSourceBuilder {
    /// Set the daemon host (default: "localhost").
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the daemon port (default: 7634).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the timeout covering connect and read (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> HddtempSource {
        let host = self.host.unwrap_or_else(|| "localhost".to_string());
        let port = self.port.unwrap_or(7634);
        let description = format!("hddtemp://{}:{}", host, port);

        HddtempSource {
            host,
            port,
            timeout: self.timeout.unwrap_or(Duration::from_secs(5)),
            description,
        }
    }
}

/// Parse a raw hddtemp response.
///
/// Best effort: records with a non-numeric temperature are dropped and the
/// remaining drives are still returned.
pub fn parse_hddtemp(response: &str) -> Vec<DriveTemperature> {
    let fields: Vec<&str> = response.split('|').collect();
    let mut drives = Vec::new();

    let mut idx = 0;
    while idx + FIELDS_PER_RECORD < fields.len() {
        let device = fields[idx + 1];
        let model = fields[idx + 2];
        let raw_temp = fields[idx + 3].trim();

        match raw_temp.parse::<f64>() {
            Ok(celsius) if celsius.is_finite() => drives.push(DriveTemperature {
                device: device.to_string(),
                model: model.to_string(),
                celsius,
            }),
            _ => {
                tracing::debug!(device, value = raw_temp, "Skipping drive without a numeric temperature");
            }
        }

        idx += FIELDS_PER_RECORD;
    }

    drives
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    const TWO_DRIVES: &str = "|/dev/sda|ST3500418AS|38|C||/dev/sdb|WDC WD10EARS|41|C|";

    #[test]
    fn test_builder_defaults() {
        let source = HddtempSource::builder().build();
        assert_eq!(source.host(), "localhost");
        assert_eq!(source.port(), 7634);
        assert_eq!(source.timeout(), Duration::from_secs(5));
        assert_eq!(source.description(), "hddtemp://localhost:7634");
    }

    #[test]
    fn parses_two_drives() {
        let drives = parse_hddtemp(TWO_DRIVES);
        assert_eq!(
            drives,
            vec![
                DriveTemperature {
                    device: "/dev/sda".to_string(),
                    model: "ST3500418AS".to_string(),
                    celsius: 38.0,
                },
                DriveTemperature {
                    device: "/dev/sdb".to_string(),
                    model: "WDC WD10EARS".to_string(),
                    celsius: 41.0,
                },
            ]
        );
    }

    #[test]
    fn skips_sleeping_drive_but_keeps_others() {
        let drives = parse_hddtemp("|/dev/sda|ST3500418AS|SLP|*||/dev/sdb|WDC|44|C|");
        assert_eq!(drives.len(), 1);
        assert_eq!(drives[0].device, "/dev/sdb");
        assert_eq!(drives[0].celsius, 44.0);
    }

    #[test]
    fn rejects_non_finite_temperatures() {
        assert!(parse_hddtemp("|/dev/sda|X|NaN|C|").is_empty());
        assert!(parse_hddtemp("|/dev/sda|X|inf|C|").is_empty());
    }

    #[test]
    fn truncated_or_empty_responses_yield_nothing() {
        assert!(parse_hddtemp("").is_empty());
        assert!(parse_hddtemp("|/dev/sda|ST3500418AS|38").is_empty());
        // Exactly five fields is not a complete record without the trailing separator
        assert!(parse_hddtemp("|/dev/sda|ST3500418AS|38|C").is_empty());
    }

    #[tokio::test]
    async fn fetch_reads_until_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Split the write to make sure the reader accumulates chunks
            socket.write_all(b"|/dev/sda|ST3500418AS|3").await.unwrap();
            socket.write_all(b"8|C||/dev/sdb|WDC WD10EARS|41|C|").await.unwrap();
        });

        let source = HddtempSource::builder()
            .host("127.0.0.1")
            .port(port)
            .build();

        let drives = source.fetch().await.unwrap();
        assert_eq!(drives.len(), 2);
        assert_eq!(drives[0].celsius, 38.0);
    }

    #[tokio::test]
    async fn fetch_reports_refused_connection() {
        // Bind to learn a free port, then release it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = HddtempSource::builder()
            .host("127.0.0.1")
            .port(port)
            .build();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[tokio::test]
    async fn fetch_times_out_on_silent_daemon() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let source = HddtempSource::builder()
            .host("127.0.0.1")
            .port(port)
            .timeout(Duration::from_millis(100))
            .build();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Timeout(_)));
        server.abort();
    }
}
