use std::cell::{Cell, RefCell};
use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use packsync_installer::{ProgressObserver, ReconcileReport, ReconcileStatus};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    resolve_output_style(
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    )
}

pub(crate) fn resolve_output_style(stdout_is_terminal: bool, no_color: bool) -> OutputStyle {
    if stdout_is_terminal && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "error" => "[ERR]",
        _ => "[..]",
    }
}

pub(crate) fn format_report_lines(report: &ReconcileReport, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::new();
    match report.status {
        ReconcileStatus::UpToDate => lines.push(render_status_line(
            style,
            "ok",
            &format!(
                "{} is already at build {}",
                report.package_id, report.build_id
            ),
        )),
        ReconcileStatus::Converged => {
            lines.push(render_status_line(
                style,
                "ok",
                &format!(
                    "converged {} to build {} (installed={} removed={} unchanged={})",
                    report.package_id,
                    report.build_id,
                    report.installed.len(),
                    report.removed.len(),
                    report.unchanged.len()
                ),
            ));
            lines.extend(report.installed.iter().map(|name| format!("  + {name}")));
            lines.extend(report.removed.iter().map(|name| format!("  - {name}")));
        }
    }
    if let Some(artifact) = &report.artifact {
        lines.push(render_status_line(
            style,
            "ok",
            &format!("copied platform artifact to {}", artifact.display()),
        ));
    }
    lines
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Install progress bar; stays silent in plain output.
pub(crate) struct TerminalProgress {
    style: OutputStyle,
    progress_bar: RefCell<Option<ProgressBar>>,
    total: Cell<u64>,
    current: Cell<u64>,
    started_at: Cell<Option<Instant>>,
}

impl TerminalProgress {
    pub(crate) fn new(style: OutputStyle) -> Self {
        Self {
            style,
            progress_bar: RefCell::new(None),
            total: Cell::new(0),
            current: Cell::new(0),
            started_at: Cell::new(None),
        }
    }
}

impl ProgressObserver for TerminalProgress {
    fn install_started(&self, total: usize) {
        self.total.set(total as u64);
        self.current.set(0);
        self.started_at.set(Some(Instant::now()));
        if self.style != OutputStyle::Rich || total == 0 {
            return;
        }

        let progress_bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.cyan.bold} {msg:<16} [{bar:20.cyan/blue}] {pos:>3}/{len:3} {elapsed_precise}",
        ) {
            progress_bar.set_style(style.tick_chars(".oO@* ").progress_chars("=>-"));
        }
        progress_bar.set_message("install");
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        *self.progress_bar.borrow_mut() = Some(progress_bar);
    }

    fn entry_finished(&self, name: &str, succeeded: bool) {
        self.current.set((self.current.get() + 1).min(self.total.get()));
        if let Some(progress_bar) = self.progress_bar.borrow().as_ref() {
            progress_bar.set_position(self.current.get());
            if !succeeded {
                progress_bar.println(render_status_line(
                    self.style,
                    "error",
                    &format!("{name} failed"),
                ));
            }
        }
    }

    fn install_finished(&self) {
        let Some(progress_bar) = self.progress_bar.borrow_mut().take() else {
            return;
        };
        progress_bar.finish_and_clear();
        if let Some(line) = render_progress_line(
            self.style,
            "install",
            self.current.get(),
            self.total.get(),
            self.started_at.get().map(|started| started.elapsed()),
        ) {
            println!("{line}");
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

fn progress_label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn progress_bar_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightBlue.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn render_progress_line(
    style: OutputStyle,
    label: &str,
    current: u64,
    total: u64,
    elapsed: Option<Duration>,
) -> Option<String> {
    if style == OutputStyle::Plain {
        return None;
    }

    let width = 18_usize;
    let safe_total = total.max(1);
    let bounded_current = current.min(safe_total);
    let filled = ((bounded_current as usize) * width) / (safe_total as usize);
    let bar = format!(
        "{}{}",
        "=".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let percent = (bounded_current * 100) / safe_total;
    let counts = format!("{}/{}", HumanCount(current), HumanCount(total));
    let suffix = elapsed
        .map(|value| format!(" complete in {}", format_elapsed(value)))
        .unwrap_or_default();

    Some(format!(
        "{} [{}] {:>3}% {}{}",
        colorize(progress_label_style(), label),
        colorize(progress_bar_style(), &bar),
        percent,
        counts,
        suffix
    ))
}
