//! Colored status lines for the operator.
//!
//! `[+]` success, `[*]` progress, `[!]` problems. Diagnostics that are only
//! useful when debugging go through `log` instead.

use std::fmt::Display;
use std::io::{Write, stdout};
use std::time::Duration;

use chrono::Local;
use colored::Colorize;
use memeswar_core::{AccountOutcome, UserInfo};

pub fn success(msg: impl Display) {
    println!("{}", format!("[+] {msg}").green());
}

pub fn info(msg: impl Display) {
    println!("{}", format!("[*] {msg}").cyan());
}

/// Already-done answers from the service.
pub fn notice(msg: impl Display) {
    println!("{}", format!("[*] {msg}").blue());
}

pub fn waiting(msg: impl Display) {
    println!("{}", format!("[*] {msg}").yellow());
}

pub fn warning(msg: impl Display) {
    println!("{}", format!("[!] {msg}").yellow());
}

pub fn failure(msg: impl Display) {
    eprintln!("{}", format!("[!] {msg}").red());
}

pub fn fatal(msg: impl Display) {
    eprintln!("\n{}", format!("[!] Fatal error: {msg}").red().bold());
}

pub fn banner() {
    println!("{}", "⚔  Memes War Bot".bright_cyan().bold());
    println!("{}", "================================".cyan());
    println!(
        "{}",
        "check-in · quests · treasury · guild warbonds".bright_black()
    );
}

pub fn account_header(index: usize, total: usize) {
    println!("\n{}", format!("[*] Account {index}/{total}").yellow());
}

pub fn user_info(user: &UserInfo) {
    let now = Local::now().format("%H:%M:%S");
    let rank = user
        .honor_point_rank
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    println!("\n{}", format!("╭── User Info [{now}] ───").cyan());
    println!("│ {}", format!("Nick: {}", user.nickname).white());
    println!(
        "│ {}",
        format!("Honor: {} │ Rank: {rank}", user.honor_points).white()
    );
    println!("│ {}", format!("Warbonds: {}", user.warbond_tokens).white());
    println!("{}", format!("╰{}", "─".repeat(30)).cyan());
}

pub fn account_summary(outcome: &AccountOutcome) {
    let treasury = outcome.treasury_reward.as_deref().unwrap_or("-");
    success(format!(
        "Pass done: check-in {}, daily {}, single {}, treasury {treasury}, sent {} warbonds in {} transfer(s)",
        if outcome.checked_in { "ok" } else { "skipped" },
        outcome.daily_quests,
        outcome.single_quests,
        outcome.warbonds_sent,
        outcome.transfers,
    ));
}

pub fn cycle_header(cycle: u64) {
    let now = Local::now().format("%H:%M:%S");
    println!("\n{}", format!("╭── Cycle #{cycle} ───").cyan());
    println!("{}", format!("╰── Started at: {now}").cyan());
}

/// Rewrites the same line; the caller prints the final newline.
pub fn countdown(remaining: Duration) {
    let secs = remaining.as_secs();
    print!(
        "\r{}",
        format!("[*] Next cycle in: {:02}:{:02}", secs / 60, secs % 60).cyan()
    );
    let _ = stdout().flush();
}
