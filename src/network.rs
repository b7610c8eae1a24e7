// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Active network selection with change notification.

use tokio::sync::watch;
use tracing::info;

use crate::blockchain::NetworkId;

/// Holds the selected network and pushes changes to subscribers.
pub struct NetworkSelector {
    tx: watch::Sender<NetworkId>,
}

impl NetworkSelector {
    pub fn new(initial: NetworkId) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> NetworkId {
        *self.tx.borrow()
    }

    /// Select `network`. Returns `true` when the selection changed; only then
    /// are subscribers notified.
    pub fn set_network(&self, network: NetworkId) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == network {
                false
            } else {
                *current = network;
                true
            }
        });
        if changed {
            info!(network = %network, "Network changed");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkId> {
        self.tx.subscribe()
    }
}

impl Default for NetworkSelector {
    fn default() -> Self {
        Self::new(NetworkId::default())
    }
}
