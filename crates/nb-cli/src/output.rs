//! Human-readable rendering. No business logic lives here — only
//! `owo_colors` styling gated on whether stdout is a terminal, keeping
//! the split between computing a result and printing it.

use is_terminal::IsTerminal;
use nb_sdk::Issue;
use owo_colors::OwoColorize;

fn colors_enabled() -> bool {
    std::io::stdout().is_terminal()
}

pub fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        if colors_enabled() {
            println!("{}", "no issues found".green());
        } else {
            println!("no issues found");
        }
        return;
    }
    for issue in issues {
        if colors_enabled() {
            println!("{} {}", issue.kind.to_string().red().bold(), issue.message);
        } else {
            println!("{}: {}", issue.kind, issue.message);
        }
        if let Some(path) = &issue.path {
            println!("  at {}", path.display());
        }
    }
}

pub fn print_created_dirs(dirs: &[std::path::PathBuf]) {
    println!("created {} folder(s):", dirs.len());
    for dir in dirs {
        println!("  {}", dir.display());
    }
}

pub fn print_transfer_result(summary: &str) {
    println!("{summary}");
}

pub fn print_next_name(kind: &str, name: &str) {
    println!("{kind}: {name}");
}
