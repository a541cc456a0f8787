use crate::api::{SortOrder, User};
use crate::ui::mvi::UiState;

/// Client-side company filter. Not sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompanyFilter {
    #[default]
    All,
    Company(String),
}

impl CompanyFilter {
    /// `"all"` (any case) or an empty string selects every company.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Company(value.to_string())
        }
    }

    pub fn accepts(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Company(name) => user.works_at(name),
        }
    }
}

/// Which modal, if any, sits over the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableDialog {
    #[default]
    Closed,
    AddUser,
    EditUser(User),
    ConfirmDelete(User),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// 1-based page number.
    pub page: u32,
    pub search: String,
    pub sort_order: SortOrder,
    pub company_filter: CompanyFilter,
    /// Whether the last loaded page was full, i.e. Next is enabled.
    pub has_more: bool,
    pub dialog: TableDialog,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            sort_order: SortOrder::Asc,
            company_filter: CompanyFilter::All,
            has_more: false,
            dialog: TableDialog::Closed,
        }
    }
}

impl UiState for TableState {}
