//! Server-level error type.

/// The error type returned by the server's fallible operations.
///
/// Application-level failures (a bad submission, an unreadable review
/// document) are expressed as HTTP [`Response`](crate::Response) values, not
/// as `Error`s. This type surfaces infrastructure failures: binding to a port
/// or reading the bound address back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
