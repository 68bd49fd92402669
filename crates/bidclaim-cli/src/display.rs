//! Terminal rendering for checker states, notices, and the dashboard table.

use std::fmt::Display;

use bidclaim_core::Identity;
use bidclaim_view::{
    CheckerState, ClaimChecker, DashboardRow, DashboardStatus, DashboardView, Notice, NoticeKind,
    SaveOutcome,
};
use chrono::{DateTime, TimeZone};

const TITLE_WIDTH: usize = 48;
const NAME_WIDTH: usize = 14;

// ── Checker ──

pub fn print_checker(checker: &ClaimChecker) {
    match checker.job_id() {
        Some(id) => println!("{:<10} {}", "job", id),
        None => println!("{:<10} (none)", "job"),
    }
    let state = checker.state();
    if *state == CheckerState::Inactive {
        println!("{:<10} not a job page", "status");
        return;
    }
    println!("{:<10} {}", "status", state.label());
    if let CheckerState::CheckError { message } | CheckerState::SaveError { message } = state {
        println!("{:<10} {}", "detail", message);
    }
}

pub fn print_notice(notice: &Notice) {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Warning => "warn",
        NoticeKind::Error => "error",
    };
    println!("[{tag}] {}", notice.message);
}

pub fn print_save_outcome(outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Saved => println!("[ok] {}", outcome.message()),
        SaveOutcome::AlreadyExists => println!("[warn] {}", outcome.message()),
        SaveOutcome::Failed(_) => println!("[error] {}", outcome.message()),
    }
}

pub fn print_error(message: &str) {
    println!("[error] {message}");
}

pub fn print_whoami(identity: Option<&Identity>, name: Option<&str>) {
    match identity {
        Some(id) => {
            println!("{:<10} {}", "id", id.id);
            if !id.email.is_empty() {
                println!("{:<10} {}", "email", id.email);
            }
        }
        None => println!("{:<10} (not signed in)", "id"),
    }
    println!("{:<10} {}", "name", name.unwrap_or("(not set)"));
}

// ── Dashboard ──

pub fn print_dashboard<Tz>(view: &DashboardView, now: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match view.status() {
        DashboardStatus::Loaded => {}
        other => {
            if let Some(msg) = other.message() {
                println!("{msg}");
            }
            return;
        }
    }

    let rows = view.rows(now);
    println!(
        "{:<16}  {:<7} {:<NAME_WIDTH$} {:<18} {:<TITLE_WIDTH$}  {}",
        "when", "badge", "by", "job", "title", "del"
    );
    for row in &rows {
        print_row(row);
    }
    println!();
    println!("Showing {} of {}", rows.len(), view.total());
    if view.has_more() {
        println!("Use --more to load more.");
    }
}

fn print_row(row: &DashboardRow) {
    println!(
        "{:<16}  {:<7} {:<NAME_WIDTH$} {:<18} {:<TITLE_WIDTH$}  {}",
        row.when,
        row.badge.label,
        truncate(&row.added_by, NAME_WIDTH),
        row.job_id,
        truncate(&row.title, TITLE_WIDTH),
        if row.can_delete { row.doc_id.as_str() } else { "" }
    );
    println!("{:<16}  {}", "", row.job_url);
}

pub fn or_no_title(title: &str) -> &str {
    if title.is_empty() { "No Title" } else { title }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
