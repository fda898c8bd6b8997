//! Output backends for emitting diagnostic messages.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use hdwatch_types::DiagnosticArray;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Upper bound on connecting to and writing to a TCP collector.
pub const TCP_SEND_TIMEOUT: Duration = Duration::from_millis(500);

/// Destination for published diagnostic messages.
#[derive(Debug)]
pub enum Output {
    /// Write each message to a JSON file, overwriting the previous one.
    File(PathBuf),

    /// Send each message to a TCP server as one line of JSON.
    ///
    /// A fresh connection is made per publish; a refused connection is
    /// skipped silently. Connect and write together are bounded by
    /// [`TCP_SEND_TIMEOUT`], and overrunning it is reported as an error.
    Tcp(String),

    /// Print each message to stdout as one line of JSON.
    Stdout,

    /// Send messages through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    Channel(tokio::sync::mpsc::Sender<DiagnosticArray>),
}

impl Output {
    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdwatch_sdk::Output;
    ///
    /// let output = Output::file("diagnostics.json");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a TCP output.
    pub fn tcp(addr: impl Into<String>) -> Self {
        Output::Tcp(addr.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdwatch_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    ///
    /// // Later, receive messages
    /// // while let Some(message) = rx.recv().await {
    /// //     println!("{} statuses, worst {:?}", message.len(), message.worst_level());
    /// // }
    /// ```
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<DiagnosticArray>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Short description used in log fields.
    pub fn describe(&self) -> String {
        match self {
            Output::File(path) => format!("file:{}", path.display()),
            Output::Tcp(addr) => format!("tcp:{}", addr),
            Output::Stdout => "stdout".to_string(),
            Output::Channel(_) => "channel".to_string(),
        }
    }

    /// Emit a message to this output.
    pub(crate) async fn emit(&self, message: &DiagnosticArray) -> io::Result<()> {
        match self {
            Output::File(path) => {
                let json = serde_json::to_string_pretty(message)?;
                tokio::fs::write(path, json).await?;
            }
            Output::Tcp(addr) => {
                let mut json = serde_json::to_string(message)?;
                json.push('\n');
                tokio::time::timeout(TCP_SEND_TIMEOUT, send_line(addr, json.as_bytes()))
                    .await
                    .map_err(|_| {
                        io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!("no response from {} within {:?}", addr, TCP_SEND_TIMEOUT),
                        )
                    })??;
            }
            Output::Stdout => {
                let mut json = serde_json::to_string(message)?;
                json.push('\n');
                let mut stdout = tokio::io::stdout();
                stdout.write_all(json.as_bytes()).await?;
                stdout.flush().await?;
            }
            Output::Channel(tx) => {
                // Don't block the publish loop on a slow consumer
                let _ = tx.try_send(message.clone());
            }
        }
        Ok(())
    }
}

async fn send_line(addr: &str, line: &[u8]) -> io::Result<()> {
    // Best effort: no server, no publish
    let Ok(mut stream) = TcpStream::connect(addr).await else {
        return Ok(());
    };
    stream.write_all(line).await
}
