//! Printer connections
//!
//! A [`Connector`] opens one [`DeviceSession`] per print job. Sessions are
//! consumed by [`DeviceSession::close`], so a session cannot be reused by a
//! later job or closed twice.
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// An open connection to one printer
#[allow(async_fn_in_trait)]
pub trait DeviceSession {
    /// Send raw bytes to the printer
    async fn send(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Close the connection
    async fn close(self) -> PrintResult<()>;
}

/// Factory for device sessions
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Session: DeviceSession;

    /// Open a fresh session for one print job
    async fn open(&self) -> PrintResult<Self::Session>;

    /// Human-readable endpoint, used in logs
    fn endpoint(&self) -> String;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        let addr = addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection and write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if the printer is online/reachable
    #[instrument(fields(addr = %self.addr))]
    pub async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

impl Connector for NetworkPrinter {
    type Session = TcpSession;

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn open(&self) -> PrintResult<TcpSession> {
        info!("Connecting to printer");

        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        Ok(TcpSession {
            stream,
            addr: self.addr,
            timeout: self.timeout,
        })
    }

    fn endpoint(&self) -> String {
        self.addr.to_string()
    }
}

/// Raw TCP session to a network printer
#[derive(Debug)]
pub struct TcpSession {
    stream: TcpStream,
    addr: SocketAddr,
    timeout: Duration,
}

impl DeviceSession for TcpSession {
    async fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        let (addr, timeout) = (self.addr, self.timeout);
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(data).await?;
            stream.flush().await
        };

        tokio::time::timeout(timeout, write)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", addr)))?
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })
    }

    async fn close(mut self) -> PrintResult<()> {
        debug!(addr = %self.addr, "Closing printer connection");
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", DEFAULT_PORT).unwrap();
        assert_eq!(printer.addr().port(), 9100);
        assert_eq!(printer.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_network_printer_from_addr() {
        let printer = NetworkPrinter::from_addr("192.168.1.100:9100").unwrap();
        assert_eq!(printer.addr().port(), 9100);
        assert_eq!(printer.endpoint(), "192.168.1.100:9100");
    }

    #[test]
    fn test_invalid_addr() {
        let result = NetworkPrinter::from_addr("invalid");
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_session_sends_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        let mut session = printer.open().await.unwrap();
        session.send(&[0x1B, 0x40]).await.unwrap();
        session.send(b"hi").await.unwrap();
        session.close().await.unwrap();

        assert_eq!(server.await.unwrap(), vec![0x1B, 0x40, b'h', b'i']);
    }

    #[tokio::test]
    async fn test_open_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        assert!(printer.open().await.is_err());
        assert!(!printer.is_online().await);
    }
}
