use crate::ui::mvi::Reducer;
use crate::ui::table::intent::TableIntent;
use crate::ui::table::state::{TableDialog, TableState};

pub struct TableReducer;

impl Reducer for TableReducer {
    type State = TableState;
    type Intent = TableIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TableIntent::SetSearch(search) => TableState {
                search,
                page: 1,
                ..state
            },
            TableIntent::SetSort(sort_order) => TableState { sort_order, ..state },
            TableIntent::SetCompanyFilter(company_filter) => TableState {
                company_filter,
                ..state
            },
            TableIntent::NextPage => {
                if state.has_more {
                    TableState {
                        page: state.page.saturating_add(1),
                        // Unknown until the next page loads
                        has_more: false,
                        ..state
                    }
                } else {
                    state
                }
            }
            TableIntent::PrevPage => TableState {
                page: state.page.saturating_sub(1).max(1),
                ..state
            },
            TableIntent::GoToPage(page) => TableState {
                page: page.max(1),
                has_more: false,
                ..state
            },
            TableIntent::PageLoaded { rows, page_size } => TableState {
                has_more: rows >= page_size,
                ..state
            },
            TableIntent::OpenAdd => TableState {
                dialog: TableDialog::AddUser,
                ..state
            },
            TableIntent::OpenEdit(user) => TableState {
                dialog: TableDialog::EditUser(user),
                ..state
            },
            TableIntent::RequestDelete(user) => TableState {
                dialog: TableDialog::ConfirmDelete(user),
                ..state
            },
            TableIntent::CloseDialog => TableState {
                dialog: TableDialog::Closed,
                ..state
            },
        }
    }
}
