//! Plain-text rendering of dashboard views.

use chrono::Local;

use crate::api::User;
use crate::query::QueryStatus;
use crate::store::Activity;
use crate::ui::table::UsersView;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load users. Try refreshing.";
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load user.";
pub const NO_ACTIVITY_MESSAGE: &str = "No activity yet.";

/// Up to two uppercase initials, one per word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Text shown when a loaded page has no rows to display.
pub fn empty_message(search: &str) -> String {
    if search.is_empty() {
        "No users to display.".to_string()
    } else {
        format!("No users match \"{search}\".")
    }
}

pub fn render_users(view: &UsersView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:<6} {:<26} {:<28} {:<22} {}\n",
        "", "ID", "Name", "Email", "Phone", "Company"
    ));

    if view.status == QueryStatus::Loading && view.users.is_empty() {
        out.push_str("Loading…\n");
    }
    for user in &view.users {
        out.push_str(&format!(
            "{:<4} {:<6} {:<26} {:<28} {:<22} {}\n",
            initials(&user.name),
            user.id,
            user.name,
            user.email,
            user.phone,
            user.company.name
        ));
    }
    if let Some(message) = &view.empty_message {
        out.push_str(message);
        out.push('\n');
    }
    if let Some(error) = &view.error {
        out.push_str(error);
        out.push('\n');
    }

    let next = if view.has_more { "next ›" } else { "" };
    let prev = if view.page > 1 { "‹ prev" } else { "" };
    out.push_str(&format!("{prev:<8} Page {} {next:>8}\n", view.page));
    out
}

pub fn render_user_detail(user: &User) -> String {
    let mut out = format!("[{}] {}\n\n", initials(&user.name), user.name);
    out.push_str("Contact Info\n");
    out.push_str(&format!("  Email:   {}\n", user.email));
    out.push_str(&format!("  Phone:   {}\n", user.phone));
    out.push_str(&format!("  Company: {}\n\n", user.company.name));
    out.push_str("Address\n");
    out.push_str(&format!("  {}\n", user.address.street));
    if !user.address.suite.is_empty() {
        out.push_str(&format!("  {}\n", user.address.suite));
    }
    out.push_str(&format!(
        "  {} - {}\n",
        user.address.city, user.address.zipcode
    ));
    out
}

pub fn render_activity(entries: &[Activity]) -> String {
    if entries.is_empty() {
        return format!("{NO_ACTIVITY_MESSAGE}\n");
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {}\n",
                entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                entry.message
            )
        })
        .collect()
}
