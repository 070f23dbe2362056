//! Prompt assembly: persona, sentiment directive, caller history, new user turn.

use crate::shared::{ConversationTurn, Role};

/// Ordered instruction sequence sent to the generation backend.
///
/// Only [`assemble`] builds one, so `len() == history.len() + 3`, the first two turns are
/// `system` and the last turn is the new `user` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    turns: Vec<ConversationTurn>,
}

impl AssembledContext {
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false for an assembled context.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn persona(&self) -> &ConversationTurn {
        &self.turns[0]
    }

    pub fn directive(&self) -> &ConversationTurn {
        &self.turns[1]
    }

    /// Caller-supplied turns, unchanged and in original order.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns[2..self.turns.len() - 1]
    }

    /// The new user turn.
    pub fn latest(&self) -> &ConversationTurn {
        &self.turns[self.turns.len() - 1]
    }

    pub fn into_turns(self) -> Vec<ConversationTurn> {
        self.turns
    }
}

/// Concatenates in fixed order. No truncation, deduplication, reordering or sanitizing.
pub fn assemble(
    persona: &str,
    sentiment_directive: &str,
    history: &[ConversationTurn],
    user_input: &str,
) -> AssembledContext {
    let mut turns = Vec::with_capacity(history.len() + 3);
    turns.push(ConversationTurn::new(Role::System, persona));
    turns.push(ConversationTurn::new(Role::System, sentiment_directive));
    turns.extend(history.iter().cloned());
    turns.push(ConversationTurn::new(Role::User, user_input));
    AssembledContext { turns }
}
