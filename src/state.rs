// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::dex::DexEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DexEngine>,
}

impl AppState {
    pub fn new(engine: DexEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
