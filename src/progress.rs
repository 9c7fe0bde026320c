// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape/export).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start of a phase with the number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One item (profile, page, job) completed.
    fn item_done(&mut self, _index: usize, _label: &str) {}

    /// One item failed; the run carries on.
    fn item_failed(&mut self, _index: usize, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// `[done/total] label` lines on stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    done: usize,
    failed: usize,
    total: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.done = 0;
        self.failed = 0;
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, _index: usize, label: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {}", self.done + self.failed, self.total, label);
    }
    fn item_failed(&mut self, _index: usize, label: &str) {
        self.failed += 1;
        eprintln!("[{}/{}] FAILED {}", self.done + self.failed, self.total, label);
    }
    fn finish(&mut self) {
        if self.total > 0 {
            eprintln!("Done: {} ok, {} failed", self.done, self.failed);
        }
    }
}
