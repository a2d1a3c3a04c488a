//! Terminal output formatting

use colored::Colorize;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tierlog_core::Severity;
use tierlog_sink::Route;

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteJson {
    pub level: Severity,
    pub pattern: String,
}

impl From<&Route> for RouteJson {
    fn from(route: &Route) -> Self {
        RouteJson {
            level: route.level,
            pattern: route.pattern.display().to_string(),
        }
    }
}

/// One `level<TAB>pattern` line per route
pub fn print_routes(routes: &[Route]) {
    if is_json_mode() {
        let rows: Vec<RouteJson> = routes.iter().map(RouteJson::from).collect();
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    for route in routes {
        println!("{}\t{}", route.level, route.pattern.display());
    }
}

pub fn print_error(message: &str) {
    if is_json_mode() {
        eprintln!("{}", serde_json::json!({ "success": false, "message": message }));
    } else {
        eprintln!("{} {}", "✗".red(), message);
    }
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
