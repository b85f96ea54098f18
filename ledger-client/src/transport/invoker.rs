//! Adapts callback-style stub methods into futures.

use super::{CallMetadata, Callback, TransportError};
use tokio::sync::oneshot;
use tracing::debug;

/// Run one stub call and await its completion.
///
/// `call` receives the request, the metadata and a callback; it is expected
/// to invoke the callback exactly once. A stub that drops the callback
/// resolves the call with [`TransportError::dropped`]. The request is passed
/// through untouched and the call is never retried.
///
/// # Errors
///
/// Returns whatever error the stub reports.
pub async fn invoke<Req, Resp, F>(
    request: Req,
    metadata: &CallMetadata,
    call: F,
) -> Result<Resp, TransportError>
where
    Resp: Send + 'static,
    F: FnOnce(Req, &CallMetadata, Callback<Resp>),
{
    let (tx, rx) = oneshot::channel();
    let callback: Callback<Resp> = Box::new(move |result| {
        if tx.send(result).is_err() {
            debug!("Caller stopped waiting before the call completed");
        }
    });
    call(request, metadata, callback);
    rx.await.unwrap_or_else(|_| Err(TransportError::dropped()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_resolves_with_success() {
        let result = invoke(21_u32, &CallMetadata::new(), |req, _md, cb| cb(Ok(req * 2))).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_resolves_with_failure() {
        let result: Result<u32, _> = invoke((), &CallMetadata::new(), |(), _md, cb| {
            cb(Err(TransportError::new(tonic::Code::Internal, "boom")));
        })
        .await;
        let err = result.unwrap_err();
        assert_eq!(err.code, tonic::Code::Internal);
        assert_eq!(err.message, "boom");
    }

    #[tokio::test]
    async fn test_dropped_callback_is_an_error() {
        let result: Result<u32, _> = invoke((), &CallMetadata::new(), |(), _md, cb| drop(cb)).await;
        assert_eq!(
            result.unwrap_err().message,
            "transport dropped the call without completing it"
        );
    }

    #[tokio::test]
    async fn test_completion_from_another_task() {
        let result = invoke("req", &CallMetadata::new(), |req, _md, cb| {
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                cb(Ok(req.len()));
            });
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_stub_sees_request_and_metadata() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_stub = Arc::clone(&seen);
        let metadata = CallMetadata::new()
            .with_authorization(secrecy::SecretString::from("token".to_string()));

        invoke("payload".to_string(), &metadata, move |req, md, cb| {
            *seen_in_stub.lock().unwrap() = Some((req, md.authorization().map(str::to_string)));
            cb(Ok(()));
        })
        .await
        .unwrap();

        let seen = seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.0, "payload");
        assert_eq!(seen.1.as_deref(), Some("token"));
    }
}
