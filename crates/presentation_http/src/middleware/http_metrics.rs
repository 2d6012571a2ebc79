//! Per-route request instrumentation
//!
//! Wraps a single route and records `http_requests_total` and
//! `http_request_duration_seconds` once the response is produced. The
//! `handler` label is fixed per layer instance, so it is attached with
//! `MethodRouter::layer` rather than on the whole router.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::Body, extract::Request, response::Response};
use infrastructure::telemetry::record_http_request;
use tower::{Layer, Service};

/// Layer recording request metrics under a fixed handler label
#[derive(Debug, Clone, Copy)]
pub struct HttpMetricsLayer {
    handler: &'static str,
}

impl HttpMetricsLayer {
    #[must_use]
    pub const fn new(handler: &'static str) -> Self {
        Self { handler }
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpMetricsService {
            inner,
            handler: self.handler,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpMetricsService<S> {
    inner: S,
    handler: &'static str,
}

impl<S> Service<Request<Body>> for HttpMetricsService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let handler = self.handler;
        let method = request.method().clone();
        let start = Instant::now();

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(request).await?;
            record_http_request(
                handler,
                method.as_str(),
                response.status().as_u16(),
                start.elapsed(),
            );
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn records_after_inner_service_responds() {
        let recorder = infrastructure::telemetry::build_prometheus_recorder().unwrap();
        let handle = recorder.handle();

        let app: Router = Router::new().route(
            "/err",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR })
                .layer(HttpMetricsLayer::new("err")),
        );

        let guard = metrics::set_default_local_recorder(&recorder);
        let response = app
            .oneshot(Request::builder().uri("/err").body(Body::empty()).unwrap())
            .await
            .unwrap();
        drop(guard);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let output = handle.render();
        assert!(output.contains("http_requests_total{code=\"500\",method=\"get\"} 1"));
        assert!(output.contains("handler=\"err\""));
    }
}
