//! Live change feed endpoint (SSE)

use api_types::events::{ChangeKind, ChangeNotification};
use axum::{
    Extension,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{
    Stream, StreamExt,
    wrappers::{BroadcastStream, errors::BroadcastStreamRecvError},
};

use crate::server::{Identity, ServerState};

fn notification(event: engine::ChangeEvent) -> ChangeNotification {
    match event {
        engine::ChangeEvent::Expenses {
            action, expense_id, ..
        } => ChangeNotification::Expenses {
            action: match action {
                engine::ChangeAction::Created => ChangeKind::Created,
                engine::ChangeAction::Updated => ChangeKind::Updated,
                engine::ChangeAction::Deleted => ChangeKind::Deleted,
            },
            expense_id,
        },
        engine::ChangeEvent::Budget { amount, .. } => ChangeNotification::Budget { amount },
    }
}

/// Forwards the owner's change events as an SSE stream.
///
/// Events published while no one listens are simply missed; the stream
/// starts from the moment of subscription.
pub async fn stream(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.engine.subscribe(&identity.owner_id).await;

    let stream = BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(event) => Some(Event::default().json_data(notification(event))),
        // A lagging reader misses events; the stream itself stays up.
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
