//! Owner-scoped change notifications.
//!
//! Every committed write publishes a [`ChangeEvent`] on the owner's
//! broadcast channel. Subscribers (the live-update endpoint) receive events
//! for their own records only; publishing never blocks a write and events
//! for owners without subscribers are dropped.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ChangeEvent {
    Expenses {
        owner_id: String,
        action: ChangeAction,
        expense_id: Uuid,
    },
    Budget {
        owner_id: String,
        amount: Decimal,
    },
}

impl ChangeEvent {
    pub fn owner_id(&self) -> &str {
        match self {
            Self::Expenses { owner_id, .. } | Self::Budget { owner_id, .. } => owner_id,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ChangeFeed {
    channels: RwLock<HashMap<String, broadcast::Sender<ChangeEvent>>>,
}

impl ChangeFeed {
    /// Opens a receiver on the owner's channel, creating the channel on
    /// first use. Slow readers miss events once the channel backlog
    /// exceeds its capacity.
    pub async fn subscribe(&self, owner_id: &str) -> broadcast::Receiver<ChangeEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(owner_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Fire and forget: an owner without subscribers has no channel and the
    /// event is dropped.
    pub async fn publish(&self, event: ChangeEvent) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(event.owner_id()) {
            let _ = sender.send(event);
        }
    }
}
