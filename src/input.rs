//! Keyboard input
//!
//! Tracks which raw keys are held and answers "is this action held?" through
//! configurable bindings. A held key stays held across ticks until its
//! key-up arrives; there is no debouncing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical actions the hero can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Attack,
}

/// Key identifiers (DOM `KeyboardEvent.key` values) bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub attack: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into(), "a".into()],
            right: vec!["ArrowRight".into(), "d".into()],
            attack: vec![" ".into()],
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[String] {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Attack => &self.attack,
        }
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        [Action::Left, Action::Right, Action::Attack]
            .into_iter()
            .find(|&action| self.keys_for(action).iter().any(|k| k == key))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashMap<String, bool>,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            held: HashMap::new(),
            bindings,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key press. Returns true if the key drives an action, so the
    /// host can suppress the browser default (page scroll on arrows/space).
    pub fn key_down(&mut self, key: &str) -> bool {
        self.held.insert(key.to_owned(), true);
        self.bindings.action_for(key).is_some()
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.held.insert(key.to_owned(), false);
        self.bindings.action_for(key).is_some()
    }

    pub fn is_key_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .iter()
            .any(|key| self.is_key_held(key))
    }

    /// Forget every held key (focus loss, reset)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Input for the next tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            attack: self.is_held(Action::Attack),
        }
    }
}
