use std::time::Duration;

/// Stopwatch for a puzzle attempt. Only counts while the caller says the puzzle is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PuzzleTimer {
    elapsed: Duration,
}

impl PuzzleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tick_if_running(&mut self, dt: Duration, running: bool) {
        if !running {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// `MM:SS.ss`
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let minutes = (total / 60.0).floor();
    let seconds = total - minutes * 60.0;
    format!("{:02}:{:05.2}", minutes as u64, seconds)
}

pub fn win_banner(elapsed: Duration) -> String {
    format!("YOU WIN!\nTIME: {}", format_elapsed(elapsed))
}
