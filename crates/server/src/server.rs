use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{budgets, events, expenses, summary};
use engine::Engine;

static OWNER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-owner-id");
static OWNER_NAME_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-owner-name");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Who is making the request, as asserted by the fronting identity layer.
///
/// The server trusts these headers completely; there is no credential
/// check here.
#[derive(Clone, Debug)]
pub struct Identity {
    pub owner_id: String,
    pub display_name: Option<String>,
}

/// `TypedHeader` for the required "x-owner-id" entry.
#[derive(Debug)]
struct OwnerIdHeader(String);

impl Header for OwnerIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &OWNER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(OwnerIdHeader(value.trim().to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-owner-id header"),
        }
    }
}

/// `TypedHeader` for the optional "x-owner-name" entry.
#[derive(Debug)]
struct OwnerNameHeader(String);

impl Header for OwnerNameHeader {
    fn name() -> &'static axum::http::HeaderName {
        &OWNER_NAME_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(OwnerNameHeader(value.trim().to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-owner-name header"),
        }
    }
}

async fn identity(
    owner_header: Option<TypedHeader<OwnerIdHeader>>,
    name_header: Option<TypedHeader<OwnerNameHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let owner_id = match owner_header {
        Some(TypedHeader(OwnerIdHeader(value))) if !value.is_empty() => value,
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let display_name = name_header
        .map(|TypedHeader(OwnerNameHeader(value))| value)
        .filter(|value| !value.is_empty());

    request.extensions_mut().insert(Identity {
        owner_id,
        display_name,
    });
    Ok(next.run(request).await)
}

pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::detail)
                .put(expenses::update)
                .delete(expenses::remove),
        )
        .route("/expenses/{id}/history", get(expenses::history))
        .route(
            "/budget",
            get(budgets::overview)
                .put(budgets::set)
                .delete(budgets::reset),
        )
        .route("/summary", get(summary::get_summary))
        .route("/events", get(events::stream))
        .route_layer(middleware::from_fn(identity))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
