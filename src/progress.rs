use std::io::{self, Write};
use std::time::Duration;

/// Observation of one completed training step.
#[derive(Clone, Debug)]
pub struct StepReport {
    pub epoch: usize,
    pub examples_trained: usize,
    pub examples_per_epoch: usize,
    /// Mean of every step loss recorded so far this epoch.
    pub mean_loss: f32,
    pub elapsed: Duration,
}

/// Side-effecting observer notified around every training step.
///
/// Purely observational: implementations must never influence the loop,
/// and the loop is correct with all events discarded.
pub trait ProgressSink {
    fn epoch_started(&mut self, epoch: usize, num_epochs: usize);

    fn step_completed(&mut self, report: &StepReport);

    fn epoch_finished(&mut self, epoch: usize);
}

/// Discards every event.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn epoch_started(&mut self, _epoch: usize, _num_epochs: usize) {}

    fn step_completed(&mut self, _report: &StepReport) {}

    fn epoch_finished(&mut self, _epoch: usize) {}
}

/// Renders a single overwritten console line per step: a fixed-width
/// bar, percent complete, example counters, mean loss, and
/// elapsed/estimated wall-clock time.
pub struct ConsoleProgressSink {
    bar_width: usize,
}

impl ConsoleProgressSink {
    pub fn new() -> Self {
        Self { bar_width: 20 }
    }
}

impl Default for ConsoleProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgressSink {
    fn epoch_started(&mut self, epoch: usize, num_epochs: usize) {
        println!("Epoch {epoch}/{num_epochs}:");
    }

    fn step_completed(&mut self, report: &StepReport) {
        // examples_trained is at least one batch by the first report, so
        // the ratio is never zero.
        let ratio = report.examples_trained as f64 / report.examples_per_epoch as f64;
        let percent = (ratio * 100.0).min(100.0);
        let bars = (percent / 100.0 * self.bar_width as f64).floor() as usize;
        let estimate = report.elapsed.div_f64(ratio);

        print!(
            "\r[{}{}]  {percent:.1}%  {}/{}  loss={:.3}  {}/{}",
            "=".repeat(bars),
            "-".repeat(self.bar_width - bars),
            report.examples_trained,
            report.examples_per_epoch,
            report.mean_loss,
            format_duration(report.elapsed),
            format_duration(estimate),
        );
        io::stdout().flush().ok();
    }

    fn epoch_finished(&mut self, _epoch: usize) {
        println!();
    }
}

/// Render a duration as `H:MM:SS`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}
