use tonic::{Request, Status, metadata::MetadataValue};

/// Metadata key carrying the correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client interceptor that tags every outgoing call with an `x-request-id`
///
/// A caller-supplied id is left untouched; otherwise a fresh UUID v4 is
/// generated. The server echoes the id back in the response metadata.
///
/// # Example
/// ```ignore
/// use grpc_client::{TracingInterceptor, create_channel};
/// use rpc::todo::todo_service_client::TodoServiceClient;
///
/// let channel = create_channel("http://127.0.0.1:50051").await?;
/// let client = TodoServiceClient::with_interceptor(channel, TracingInterceptor::new());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TracingInterceptor;

impl TracingInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl tonic::service::Interceptor for TracingInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(existing) = request.metadata().get(REQUEST_ID_HEADER) {
            tracing::debug!(
                target: "grpc_client",
                request_id = ?existing,
                "Outgoing gRPC request"
            );
            return Ok(request);
        }

        let request_id = uuid::Uuid::new_v4().to_string();
        let value: MetadataValue<_> = request_id
            .parse()
            .map_err(|_| Status::internal("Failed to create request ID"))?;
        request.metadata_mut().insert(REQUEST_ID_HEADER, value);

        tracing::debug!(
            target: "grpc_client",
            request_id = %request_id,
            "Outgoing gRPC request"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::service::Interceptor;

    #[test]
    fn test_generates_request_id() {
        let mut interceptor = TracingInterceptor::new();
        let req = interceptor.call(Request::new(())).unwrap();
        let id_str = req.metadata().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id_str).is_ok());
    }

    #[test]
    fn test_keeps_caller_request_id() {
        let mut interceptor = TracingInterceptor::new();
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert(REQUEST_ID_HEADER, "caller-id".parse().unwrap());

        let req = interceptor.call(request).unwrap();
        assert_eq!(req.metadata().get(REQUEST_ID_HEADER).unwrap(), "caller-id");
    }
}
