//! # Purchase Gateway
//!
//! The seam between the confirmation screen and the network.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Submission                                  │
//! │                                                                         │
//! │  ConfirmScreen::submit()                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dyn PurchaseGateway ──► HttpPurchaseGateway (production)               │
//! │         │            └─► test doubles (screen tests)                    │
//! │         ▼                                                               │
//! │  POST <base>/purchase  { items, subtotal, total }                       │
//! │         │                                                               │
//! │         ├── 2xx ─────────────► Ok(())                                   │
//! │         ├── other status ────► Err(ApiError::Rejected { status })       │
//! │         └── no response ─────► Err(ApiError::Transport | Timeout)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use register_core::PurchaseRequest;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Submits purchases. One call per OK press; never retried automatically.
#[async_trait]
pub trait PurchaseGateway: Send + Sync {
    async fn submit(&self, request: &PurchaseRequest) -> ApiResult<()>;
}

/// reqwest-backed gateway.
#[derive(Debug, Clone)]
pub struct HttpPurchaseGateway {
    client: reqwest::Client,
    url: Url,
}

impl HttpPurchaseGateway {
    /// Builds a gateway for `<config.endpoint>/purchase`.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let url = config.purchase_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(HttpPurchaseGateway { client, url })
    }

    /// The resolved purchase URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PurchaseGateway for HttpPurchaseGateway {
    async fn submit(&self, request: &PurchaseRequest) -> ApiResult<()> {
        let attempt = Uuid::new_v4();
        debug!(
            %attempt,
            url = %self.url,
            items = request.items.len(),
            subtotal = %request.subtotal,
            total = %request.total,
            "Submitting purchase"
        );

        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(%attempt, error = %e, "Purchase request failed");
                ApiError::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            info!(%attempt, status = status.as_u16(), total = %request.total, "Purchase accepted");
            Ok(())
        } else {
            warn!(%attempt, status = status.as_u16(), "Purchase rejected");
            Err(ApiError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use register_core::{compute_totals, CartLine, Money};
    use serde_json::{json, Value};

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn_server(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();

        let app = Router::new().route(
            "/purchase",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().unwrap().push(body);
                    status
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), received)
    }

    fn sample_request() -> PurchaseRequest {
        let items = vec![
            CartLine::new(Money::from_yen(1000), 2).with_field("NAME", "Tote"),
            CartLine::new(Money::from_yen(500), 1),
        ];
        let totals = compute_totals(&items);
        PurchaseRequest::from_snapshot(items, &totals)
    }

    #[tokio::test]
    async fn test_success_posts_body() {
        let (base, received) = spawn_server(StatusCode::OK).await;
        let gateway = HttpPurchaseGateway::new(&ApiConfig::with_endpoint(base)).unwrap();

        gateway.submit(&sample_request()).await.unwrap();

        let bodies = received.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0],
            json!({
                "items": [
                    { "PRICE": 1000, "qty": 2, "NAME": "Tote" },
                    { "PRICE": 500, "qty": 1 }
                ],
                "subtotal": 2500,
                "total": 2750
            })
        );
    }

    #[tokio::test]
    async fn test_created_counts_as_success() {
        let (base, _) = spawn_server(StatusCode::CREATED).await;
        let gateway = HttpPurchaseGateway::new(&ApiConfig::with_endpoint(base)).unwrap();

        assert!(gateway.submit(&sample_request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_rejection() {
        let (base, _) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR).await;
        let gateway = HttpPurchaseGateway::new(&ApiConfig::with_endpoint(base)).unwrap();

        let err = gateway.submit(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway =
            HttpPurchaseGateway::new(&ApiConfig::with_endpoint(format!("http://{}", addr)))
                .unwrap();

        let err = gateway.submit(&sample_request()).await.unwrap_err();
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_requires_endpoint() {
        assert!(matches!(
            HttpPurchaseGateway::new(&ApiConfig::default()),
            Err(ApiError::MissingEndpoint)
        ));
    }
}
