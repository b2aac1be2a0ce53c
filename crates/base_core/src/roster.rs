use crate::{BaseId, GameState};

/// The base after (or before) `current` among bases sharing its location,
/// wrapping around. Returns `current` itself when it is alone there, and
/// `None` if it does not exist.
pub fn next_base<'a>(state: &'a GameState, current: &BaseId, forwards: bool) -> Option<&'a BaseId> {
    let location = &state.base(current)?.location;
    let siblings: Vec<&BaseId> = state
        .bases
        .iter()
        .filter(|base| &base.location == location)
        .map(|base| &base.id)
        .collect();
    let position = siblings.iter().position(|id| *id == current)?;
    let len = siblings.len();
    let next = if forwards {
        (position + 1) % len
    } else {
        (position + len - 1) % len
    };
    Some(siblings[next])
}
