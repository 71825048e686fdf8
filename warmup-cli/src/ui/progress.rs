//! Terminal rendering of the animated loading progress.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use warmup::estimator::AnimatedFrame;
use warmup::pipeline::format_size;
use warmup::WarmupReport;

/// Bar resolution: tenths of a percent.
const BAR_LENGTH: u64 = 1000;

/// How many failures to list in the summary.
const MAX_LISTED_FAILURES: usize = 10;

/// Progress bar fed by animator frames.
pub struct LoadingBar {
    bar: ProgressBar,
}

impl LoadingBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(BAR_LENGTH);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn update(&self, frame: &AnimatedFrame) {
        self.bar.set_position(bar_position(frame.animated));
        self.bar.set_message(frame.status.message());
    }

    /// Follow `frames` until the animation ends.
    pub async fn follow(&self, mut frames: watch::Receiver<AnimatedFrame>) {
        loop {
            let frame = *frames.borrow_and_update();
            self.update(&frame);
            if frames.changed().await.is_err() {
                break;
            }
        }
        let last = *frames.borrow();
        self.update(&last);
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    /// Leave the bar where it is, with a final message.
    pub fn abandon(&self, message: &'static str) {
        self.bar.abandon_with_message(message);
    }
}

fn bar_position(animated: f64) -> u64 {
    ((animated.clamp(0.0, 100.0) / 100.0) * BAR_LENGTH as f64).round() as u64
}

/// Print a run summary.
pub fn print_summary(report: &WarmupReport) {
    println!();
    let headline = if report.cancelled {
        style("Warm-up cancelled").yellow().bold()
    } else if report.failed() > 0 {
        style("Warm-up finished with failures").yellow().bold()
    } else {
        style("Warm-up complete").green().bold()
    };
    println!("{}", headline);

    println!(
        "  Assets:     {} loaded, {} failed, {} total",
        report.succeeded(),
        report.failed(),
        report.total
    );
    for tier in &report.tiers {
        println!(
            "  {:<10}  {}/{} in {} chunk(s)",
            format!("{}:", tier.tier),
            tier.outcome.succeeded(),
            tier.outcome.total,
            tier.outcome.chunks_completed
        );
    }

    let stats = &report.stats;
    println!("  Bytes:      {}", format_size(stats.total_size));
    if let Some(largest) = &stats.largest {
        println!(
            "  Largest:    {} ({})",
            largest.handle,
            format_size(largest.size)
        );
    }
    if let Some(slowest) = &stats.slowest {
        println!(
            "  Slowest:    {} ({} ms)",
            slowest.handle,
            slowest.time.as_millis()
        );
    }
    println!("  Elapsed:    {:.2}s", report.elapsed.as_secs_f64());

    let failures: Vec<_> = report
        .tiers
        .iter()
        .flat_map(|tier| tier.outcome.failures())
        .collect();
    if !failures.is_empty() {
        println!();
        println!("{}", style("Failures:").red());
        for failure in failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  {}", failure);
        }
        if failures.len() > MAX_LISTED_FAILURES {
            println!("  ... and {} more", failures.len() - MAX_LISTED_FAILURES);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_position() {
        assert_eq!(bar_position(0.0), 0);
        assert_eq!(bar_position(42.37), 424);
        assert_eq!(bar_position(100.0), BAR_LENGTH);
        assert_eq!(bar_position(140.0), BAR_LENGTH);
        assert_eq!(bar_position(-1.0), 0);
    }
}
