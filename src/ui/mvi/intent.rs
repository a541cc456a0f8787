/// Marker trait for intents: user actions (typing a search, paging,
/// opening a dialog) and load results fed back into the view.
pub trait Intent: Send + 'static {}
