//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{GuardDecision, Identity, Role, Route, RouteSet};
use crate::config::AccessConfig;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Describe a guard decision, including where a redirect goes
pub fn format_decision(decision: GuardDecision, access: &AccessConfig) -> String {
    match decision {
        GuardDecision::Allow => "allowed".green().to_string(),
        GuardDecision::Pending => "pending".yellow().to_string(),
        GuardDecision::Redirect(redirect) => {
            format!("{} {}", "redirect to".red(), redirect.path(access))
        }
    }
}

fn join_routes(routes: &RouteSet) -> String {
    if routes.is_empty() {
        return "-".to_string();
    }
    routes
        .iter()
        .map(Route::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the signed-in user
pub fn print_identity(identity: &Identity) {
    println!("{}", "Signed In".bold().underline());
    println!();
    println!("  {} {}", "Name:".bold(), identity.name);
    println!("  {} {}", "Email:".bold(), identity.email);
    println!("  {} {}", "Role:".bold(), identity.role().to_string().cyan());
    println!("  {} {}", "ID:".bold(), identity.id());

    if !identity.subjects.is_empty() {
        println!("  {} {}", "Subjects:".bold(), identity.subjects.join(", "));
    }
    if !identity.bio.is_empty() {
        println!("  {} {}", "Bio:".bold(), identity.bio);
    }

    println!();
    println!("  {}", "Routes:".bold());
    for route in identity.allowed_routes() {
        println!("    {} {}", "●".green(), route);
    }
}

/// Print a table of roles and the routes they may open
pub fn print_route_table(rows: &[(Role, RouteSet)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Routes").fg(Color::Cyan),
        ]);

    for (role, routes) in rows {
        let color = if routes.is_empty() {
            Color::Red
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(role.as_str()),
            Cell::new(join_routes(routes)).fg(color),
        ]);
    }

    println!("{table}");
}
