/// Marker trait for view state.
///
/// `PartialEq` lets callers skip re-rendering when a reduce step changed
/// nothing.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
