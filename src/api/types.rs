use serde::{Deserialize, Serialize};

/// Postal address attached to a user record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
}

/// A user record as served by the users API.
///
/// Only `id` identifies a record; everything else is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub address: Address,
}

impl User {
    /// Case-insensitive substring match on the display name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Case-insensitive equality on the company name.
    pub fn works_at(&self, company: &str) -> bool {
        self.company.name.trim().to_lowercase() == company.trim().to_lowercase()
    }

    /// Overwrite the editable fields with a draft, keeping id and address.
    pub fn apply(&mut self, draft: &UserDraft) {
        self.name = draft.name.clone();
        self.email = draft.email.clone();
        self.phone = draft.phone.clone();
        self.company = Company {
            name: draft.company.clone(),
        };
    }

    /// Build a record from a draft under the given id.
    pub fn from_draft(id: u64, draft: &UserDraft) -> Self {
        let mut user = Self {
            id,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: Company::default(),
            address: Address::default(),
        };
        user.apply(draft);
        user
    }
}

/// Body sent on create and update. The company travels as a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

/// Email sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse "asc"/"desc", case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Parameters for one page of the users list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_email: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            search: None,
            sort_email: None,
            company: None,
        }
    }

    /// Query string pairs in the json-server dialect the demo API speaks.
    ///
    /// Empty search and company values are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("_page", self.page.to_string()),
            ("_limit", self.limit.to_string()),
        ];
        if let Some(order) = self.sort_email {
            pairs.push(("_sort", "email".to_string()));
            pairs.push(("_order", order.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("q", search.to_string()));
        }
        if let Some(company) = self.company.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("company.name", company.to_string()));
        }
        pairs
    }
}

/// Keep only users whose name contains `search`; empty search keeps all.
pub fn filter_by_search(users: Vec<User>, search: Option<&str>) -> Vec<User> {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => users.into_iter().filter(|u| u.name_contains(needle)).collect(),
        None => users,
    }
}

/// Unique, trimmed, non-empty company names in first-seen order.
pub fn unique_companies(users: &[User]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for user in users {
        let name = user.company.name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str, company: &str) -> User {
        User::from_draft(
            id,
            &UserDraft {
                name: name.to_string(),
                email: format!("user{id}@example.com"),
                phone: String::new(),
                company: company.to_string(),
            },
        )
    }

    #[test]
    fn query_pairs_include_sort_and_search() {
        let params = ListParams {
            page: 2,
            limit: 5,
            search: Some("Lea".to_string()),
            sort_email: Some(SortOrder::Desc),
            company: Some("Romaguera-Crona".to_string()),
        };
        assert_eq!(
            params.query_pairs(),
            vec![
                ("_page", "2".to_string()),
                ("_limit", "5".to_string()),
                ("_sort", "email".to_string()),
                ("_order", "desc".to_string()),
                ("q", "Lea".to_string()),
                ("company.name", "Romaguera-Crona".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_skip_empty_search() {
        let mut params = ListParams::page(1, 5);
        params.search = Some(String::new());
        assert_eq!(params.query_pairs().len(), 2);
    }

    #[test]
    fn search_filter_is_case_insensitive() {
        let users = vec![user(1, "Leanne Graham", "A"), user(2, "Ervin Howell", "B")];
        let filtered = filter_by_search(users, Some("lea"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn unique_companies_trims_and_dedupes() {
        let users = vec![
            user(1, "A", " Acme "),
            user(2, "B", "Acme"),
            user(3, "C", ""),
            user(4, "D", "Globex"),
        ];
        assert_eq!(unique_companies(&users), vec!["Acme", "Globex"]);
    }

    #[test]
    fn user_decodes_without_optional_fields() {
        let user: User =
            serde_json::from_str(r#"{"id": 3, "name": "Clementine", "email": "c@x.io"}"#)
                .unwrap();
        assert_eq!(user.company, Company::default());
        assert!(user.phone.is_empty());
    }
}
