use crate::census::types::{CensusReport, Comparison, ForkRow, ForkStatus};
use crate::github::types::RepoSnapshot;
use chrono::{DateTime, Utc};

const LONG_DATE: &str = "%a, %d %b %Y %H:%M:%S UTC";
const SHORT_DATE: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatForm {
    /// The repository that was asked about.
    Long,
    /// One fork among many.
    Short,
}

pub fn render(upstream: &RepoSnapshot, report: &CensusReport, show_commits: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}: {}\n - {}\n\n",
        upstream.name,
        upstream.description.as_deref().unwrap_or(""),
        upstream.html_url
    ));
    out.push_str(&stat_line(upstream, StatForm::Long));

    let tally = &report.tally;
    if tally.total == 0 {
        return out;
    }

    out.push_str(&format!("Forks of {}:\n\n", upstream.full_name));
    for row in &report.rows {
        render_row(&mut out, row, tally.total, show_commits);
    }

    out.push_str(&format!(
        "Found {} forks: {} mirrors, {} outdated, {} broken\n",
        tally.total, tally.mirror, tally.outdated, tally.broken
    ));
    out
}

fn render_row(out: &mut String, row: &ForkRow, total: usize, show_commits: bool) {
    let c = &row.comparison;
    out.push_str(&format!("{} {}\n", row_index(row.position + 1, total), row.fork.full_name));
    out.push_str(&status_line(c));
    out.push('\n');
    out.push_str(&stat_line(&row.fork, StatForm::Short));

    if show_commits && c.status.has_own_commits() {
        for commit in &c.commits {
            out.push_str(&format!(
                "{}  Authored by {} at {}\n{}\n",
                commit.short_sha(),
                commit.author,
                format_time(commit.time, SHORT_DATE),
                commit.message.trim_end()
            ));
        }
        out.push_str(&format!("{}\n\n", c.diff_url));
    }
}

/// `[ 3/150]`-style counter, right-aligned to the width of `total`.
pub fn row_index(row: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("[{row:>width$}/{total}]")
}

pub fn status_line(c: &Comparison) -> String {
    if c.status == ForkStatus::Unreachable {
        return c.status.to_string();
    }
    format!(
        "{} ({} commits - {} ahead, {} behind)",
        c.status, c.total_commits, c.ahead_by, c.behind_by
    )
}

fn stat_line(repo: &RepoSnapshot, form: StatForm) -> String {
    let counts = format!(
        "Watchers: {}\tStars: {}\tForks: {}",
        repo.subscribers, repo.stars, repo.forks
    );
    match form {
        StatForm::Short => format!(
            "{counts}\tIssues/PRs: {}\tLast push: {}\n\n",
            repo.open_issues,
            format_time(repo.pushed_at, SHORT_DATE)
        ),
        StatForm::Long => format!(
            "{counts}\n\nThis repository has {} open issues and PRs\nMost recent push: {}\n\n",
            repo.open_issues,
            format_time(repo.pushed_at, LONG_DATE)
        ),
    }
}

fn format_time(time: Option<DateTime<Utc>>, fmt: &str) -> String {
    match time {
        Some(t) => t.format(fmt).to_string(),
        None => "unknown".to_string(),
    }
}
