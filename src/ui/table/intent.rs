use crate::api::{SortOrder, User};
use crate::ui::mvi::Intent;
use crate::ui::table::state::CompanyFilter;

#[derive(Debug, Clone)]
pub enum TableIntent {
    /// New search text. Jumps back to page 1.
    SetSearch(String),
    SetSort(SortOrder),
    SetCompanyFilter(CompanyFilter),
    /// Ignored when the current page was not full.
    NextPage,
    /// Clamped at page 1.
    PrevPage,
    /// Jump straight to a page, e.g. from a deep link. Clamped at page 1.
    GoToPage(u32),
    /// A page finished loading with `rows` rows before client-side filtering.
    PageLoaded { rows: usize, page_size: usize },
    OpenAdd,
    OpenEdit(User),
    RequestDelete(User),
    CloseDialog,
}

impl Intent for TableIntent {}
