//! Route configuration for the redirect endpoint.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, redeem_link, RedirectAppState};

/// Creates the public router.
///
/// Routes:
/// - `GET /shill/:id` - Generate a reply and redirect to the tweet composer
/// - `GET /health-check` - Liveness check
pub fn redirect_router() -> Router<RedirectAppState> {
    Router::new()
        .route("/shill/:id", get(redeem_link))
        .route("/health-check", get(health_check))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::memory::{
        InMemoryConfigurationRepository, InMemoryLinkRepository, InMemoryReplyRepository,
    };
    use crate::application::{RedeemLinkHandler, ReplyGenerator};
    use crate::domain::foundation::{ChatId, LinkId};
    use crate::domain::reply::{GeneratedLinkRecord, PersonaTable, ReplyFlavor};
    use crate::ports::LinkRepository;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(
        provider: MockAIProvider,
        links: Arc<InMemoryLinkRepository>,
    ) -> RedirectAppState {
        let generator = Arc::new(ReplyGenerator::new(
            Arc::new(provider),
            Arc::new(PersonaTable::default()),
            Arc::new(InMemoryConfigurationRepository::new()),
        ));
        RedirectAppState::new(Arc::new(RedeemLinkHandler::new(
            links,
            Arc::new(InMemoryReplyRepository::new()),
            generator,
        )))
    }

    fn empty_state() -> RedirectAppState {
        let links = Arc::new(InMemoryLinkRepository::new());
        test_state(MockAIProvider::new(), links)
    }

    async fn get(state: RedirectAppState, uri: String) -> axum::response::Response {
        redirect_router()
            .with_state(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn health_check_responds() {
        let state = empty_state();
        let response = get(state, "/health-check".to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn known_link_redirects_to_intent() {
        let links = Arc::new(InMemoryLinkRepository::new());
        let link = GeneratedLinkRecord::new(
            ChatId::new(1),
            "555",
            "https://x.com/a/status/555",
            "gm",
            ReplyFlavor::Shill,
        );
        links.insert(&link).await.unwrap();
        let state = test_state(MockAIProvider::new().with_response("\"lfg\""), links);

        let response = get(state, format!("/shill/{}", link.id)).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://twitter.com/intent/tweet?in_reply_to=555&text=lfg"
        );
    }

    #[tokio::test]
    async fn unknown_link_is_404() {
        let state = empty_state();
        let response = get(state, format!("/shill/{}", LinkId::new())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_404() {
        let state = empty_state();
        let response = get(state, "/shill/not-a-uuid".to_string()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
