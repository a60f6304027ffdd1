//! Asset readiness gate
//!
//! Every sprite the renderer needs is registered up front. Loaders report
//! back one asset at a time and the tracker re-checks completion after each
//! report. The session refuses to start until everything is loaded, and a
//! single failure blocks it for good (no automatic retry).

use std::collections::BTreeMap;

use crate::error::{GameError, Result};

/// Sprites the game cannot run without
pub const REQUIRED_IMAGES: [&str; 5] = ["hero", "bear", "sword", "lightning", "background"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    Pending,
    Loaded,
    Failed(String),
}

/// Overall state of the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Pending { remaining: usize },
    Ready,
    Failed { asset: String, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct AssetTracker {
    assets: BTreeMap<String, AssetState>,
}

impl AssetTracker {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: ids
                .into_iter()
                .map(|id| (id.into(), AssetState::Pending))
                .collect(),
        }
    }

    /// Tracker for the game's own sprite set
    pub fn for_game() -> Self {
        Self::new(REQUIRED_IMAGES)
    }

    /// Tracker with every asset already loaded (headless runs, tests)
    pub fn preloaded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracker = Self::new(ids);
        for state in tracker.assets.values_mut() {
            *state = AssetState::Loaded;
        }
        tracker
    }

    pub fn state(&self, id: &str) -> Option<&AssetState> {
        self.assets.get(id)
    }

    /// Report a successful load; returns the readiness after this report
    pub fn mark_loaded(&mut self, id: &str) -> Result<Readiness> {
        let state = self
            .assets
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownAsset(id.to_owned()))?;
        // A failure is final
        if *state == AssetState::Pending {
            *state = AssetState::Loaded;
        }
        log::debug!("Asset loaded: {id}");
        Ok(self.readiness())
    }

    /// Report a failed load; returns the readiness after this report
    pub fn mark_failed(&mut self, id: &str, reason: impl Into<String>) -> Result<Readiness> {
        let state = self
            .assets
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownAsset(id.to_owned()))?;
        let reason = reason.into();
        log::error!("Error loading asset `{id}`: {reason}");
        *state = AssetState::Failed(reason);
        Ok(self.readiness())
    }

    pub fn readiness(&self) -> Readiness {
        if let Some((asset, AssetState::Failed(reason))) = self
            .assets
            .iter()
            .find(|(_, state)| matches!(state, AssetState::Failed(_)))
        {
            return Readiness::Failed {
                asset: asset.clone(),
                reason: reason.clone(),
            };
        }
        let remaining = self
            .assets
            .values()
            .filter(|state| **state == AssetState::Pending)
            .count();
        if remaining == 0 {
            Readiness::Ready
        } else {
            Readiness::Pending { remaining }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness() == Readiness::Ready
    }

    /// `Ok` only when every asset is loaded
    pub fn ensure_ready(&self) -> Result<()> {
        match self.readiness() {
            Readiness::Ready => Ok(()),
            Readiness::Pending { remaining } => Err(GameError::AssetsPending { remaining }),
            Readiness::Failed { asset, reason } => Err(GameError::AssetLoad { asset, reason }),
        }
    }
}
