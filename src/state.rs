// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::session::WalletSession;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<WalletSession>,
}

impl AppState {
    pub fn new(session: Arc<WalletSession>) -> Self {
        Self { session }
    }
}
