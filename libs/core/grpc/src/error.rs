use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors from channel creation and server setup
#[derive(Error, Debug)]
pub enum GrpcError {
  /// Invalid URI provided for connection
  #[error("Invalid URI: {0}")]
  InvalidUri(#[source] tonic::transport::Error),

  /// Failed to establish connection
  #[error("Connection failed: {0}")]
  ConnectionFailed(#[source] tonic::transport::Error),

  /// Host/port pair that does not parse as a socket address
  #[error("Invalid listen address '{addr}': {source}")]
  InvalidAddress {
    addr: String,
    #[source]
    source: std::net::AddrParseError,
  },
}

impl From<GrpcError> for tonic::Status {
  fn from(err: GrpcError) -> Self {
    match err {
      GrpcError::InvalidUri(_) | GrpcError::InvalidAddress { .. } => {
        tonic::Status::invalid_argument(err.to_string())
      }
      GrpcError::ConnectionFailed(_) => tonic::Status::unavailable(err.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_invalid_address_maps_to_invalid_argument() {
    let source = "nope".parse::<std::net::SocketAddr>().unwrap_err();
    let err = GrpcError::InvalidAddress {
      addr: "nope".to_string(),
      source,
    };
    assert!(err.to_string().contains("nope"));

    let status: tonic::Status = err.into();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
  }
}
