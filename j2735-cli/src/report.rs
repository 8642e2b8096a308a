//! Ingest run statistics and end-of-run summary

use j2735_translator::ElementType;
use std::collections::BTreeMap;

/// Counters for one or more ingest runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Messages polled from the source (including unparsable lines)
    pub messages: usize,
    /// Messages translated and written
    pub translated: usize,
    /// Messages that failed to parse or translate
    pub failed: usize,
    /// Messages excluded by the element filter
    pub skipped: usize,
    /// Batches processed
    pub batches: usize,
    /// Translated messages per element type
    pub per_element: BTreeMap<String, usize>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_translated(&mut self, element: ElementType) {
        self.translated += 1;
        *self.per_element.entry(element.name().to_string()).or_insert(0) += 1;
    }

    /// Fold another run's counters into this one
    pub fn merge(&mut self, other: &IngestStats) {
        self.messages += other.messages;
        self.translated += other.translated;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.batches += other.batches;
        for (element, count) in &other.per_element {
            *self.per_element.entry(element.clone()).or_insert(0) += count;
        }
    }

    /// Render the summary block
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("=== TRANSLATION SUMMARY ===\n");
        out.push_str(&format!("Messages received: {}\n", self.messages));
        out.push_str(&format!("Translated: {}\n", self.translated));
        out.push_str(&format!("Failed: {}\n", self.failed));
        out.push_str(&format!("Skipped (filtered): {}\n", self.skipped));
        out.push_str(&format!("Batches: {}\n", self.batches));

        if !self.per_element.is_empty() {
            out.push_str("\nBy element type:\n");
            let mut sorted: Vec<_> = self.per_element.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (element, count) in sorted {
                out.push_str(&format!("  {:<20} {}\n", element, count));
            }
        }
        out
    }

    pub fn print_summary(&self) {
        eprint!("\n{}", self.summary());
    }
}
