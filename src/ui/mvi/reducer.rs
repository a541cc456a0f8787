use super::intent::Intent;
use super::state::UiState;

/// The only place view state changes.
///
/// Must stay pure: no I/O, no cache access. Side effects (fetches,
/// mutations) are driven by the controller around it.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
