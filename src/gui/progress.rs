// src/gui/progress.rs
use std::sync::{Arc, Mutex};
use crate::progress::Progress;

/// Writes progress into the status line the UI thread paints every frame.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    done: usize,
    failed: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, done: 0, failed: 0, total: 0 }
    }

    fn set_status(&self, msg: impl Into<String>) {
        let text = msg.into();
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = text;
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.done = 0;
        self.failed = 0;
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn item_done(&mut self, _index: usize, label: &str) {
        self.done += 1;
        self.set_status(format!("Fetched {} ({}/{})", label, self.done + self.failed, self.total));
    }
    fn item_failed(&mut self, _index: usize, label: &str) {
        self.failed += 1;
        self.set_status(format!("Failed {} ({}/{})", label, self.done + self.failed, self.total));
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status(s!("Fetch complete"));
        } else if self.failed == 0 {
            self.set_status(format!("Fetch complete ({}/{})", self.done, self.total));
        } else {
            self.set_status(format!(
                "Fetch complete ({}/{}, {} failed)",
                self.done, self.total, self.failed
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tracks_counts() {
        let status = Arc::new(Mutex::new(s!()));
        let mut p = GuiProgress::new(status.clone());
        p.begin(3);
        p.item_done(0, "a");
        p.item_failed(1, "b");
        assert_eq!(*status.lock().unwrap(), "Failed b (2/3)");
        p.item_done(2, "c");
        p.finish();
        assert_eq!(*status.lock().unwrap(), "Fetch complete (2/3, 1 failed)");
    }
}
