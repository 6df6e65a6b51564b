use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

/// Like/dislike membership of a video. A user id is in at most one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionState {
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
}

impl ReactionState {
    pub fn new(likes: Vec<Uuid>, dislikes: Vec<Uuid>) -> Self {
        Self { likes, dislikes }
    }

    #[cfg(test)]
    fn reaction_of(&self, user_id: Uuid) -> Option<Reaction> {
        if self.likes.contains(&user_id) {
            Some(Reaction::Like)
        } else if self.dislikes.contains(&user_id) {
            Some(Reaction::Dislike)
        } else {
            None
        }
    }
}

/// Applies a like or dislike from `user_id`.
///
/// The opposite reaction is always cleared; the requested one is toggled.
pub fn toggle(mut state: ReactionState, user_id: Uuid, reaction: Reaction) -> ReactionState {
    let (target, opposite) = match reaction {
        Reaction::Like => (&mut state.likes, &mut state.dislikes),
        Reaction::Dislike => (&mut state.dislikes, &mut state.likes),
    };

    opposite.retain(|id| *id != user_id);

    if target.contains(&user_id) {
        target.retain(|id| *id != user_id);
    } else {
        target.push(user_id);
    }

    state
}
