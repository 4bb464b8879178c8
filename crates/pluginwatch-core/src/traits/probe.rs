// SPDX-FileCopyrightText: 2026 Pluginwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic URL liveness capability.

use async_trait::async_trait;

use crate::types::Probe;

/// Bounded-time reachability check for arbitrary URLs.
///
/// Implementations never fail: every error is folded into a [`Probe`] value.
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Probe;

    async fn is_reachable(&self, url: &str) -> bool {
        self.probe(url).await.is_reachable()
    }
}
