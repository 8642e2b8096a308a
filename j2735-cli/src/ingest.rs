//! Ingestion loop
//!
//! Polls batches of decoded elements from a source, translates each batch in
//! parallel, and writes the records in input order. A failing message is
//! logged and skipped; it never stops the stream. Shutdown is cooperative:
//! the running flag is checked between batches, so the current batch always
//! completes.

use crate::report::IngestStats;
use anyhow::{Context, Result};
use j2735_translator::{RawElement, TranslateError, TranslatedMessage, Translator};
use rayon::prelude::*;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Why one input line could not be turned into a `RawElement`
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-message failures at the ingest boundary
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{source_name}:{line}: invalid message: {error}")]
    Parse {
        source_name: String,
        line: usize,
        error: LineError,
    },

    #[error("{source_name}:{line}: {error}")]
    Translate {
        source_name: String,
        line: usize,
        error: TranslateError,
    },
}

/// One polled message: the parsed element, or why it could not be parsed
#[derive(Debug)]
pub struct Polled {
    pub line: usize,
    pub element: std::result::Result<RawElement, LineError>,
}

/// A source of decoded elements, polled in batches
pub trait MessageSource {
    /// Name used in log lines
    fn name(&self) -> &str;

    /// Return up to `max` messages; an empty batch means the source is exhausted
    fn poll(&mut self, max: usize) -> Result<Vec<Polled>>;
}

/// Reads one JSON-encoded `RawElement` per line, skipping blank lines
pub struct JsonLinesSource<R: BufRead> {
    name: String,
    reader: R,
    line_no: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            line_no: 0,
        }
    }
}

impl<R: BufRead> MessageSource for JsonLinesSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self, max: usize) -> Result<Vec<Polled>> {
        let mut batch = Vec::with_capacity(max);
        let mut buf = Vec::new();

        while batch.len() < max {
            buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Failed to read from {}", self.name))?;
            if read == 0 {
                break;
            }
            self.line_no += 1;

            // Encoding errors belong to the line, not the stream
            let element = match std::str::from_utf8(&buf) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => serde_json::from_str(text.trim()).map_err(LineError::from),
                Err(e) => Err(LineError::from(e)),
            };
            batch.push(Polled {
                line: self.line_no,
                element,
            });
        }

        Ok(batch)
    }
}

/// Destination for translated messages
pub trait RecordSink {
    fn write(&mut self, message: &TranslatedMessage) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes one JSON document per message
pub struct JsonLinesSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write(&mut self, message: &TranslatedMessage) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, message)?;
        } else {
            serde_json::to_writer(&mut self.writer, message)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl RecordSink for Vec<TranslatedMessage> {
    fn write(&mut self, message: &TranslatedMessage) -> Result<()> {
        self.push(message.clone());
        Ok(())
    }
}

/// Cooperative stop flag shared between the ingest loop and its controller
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Request a stop after the current batch
    pub fn close(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

enum Outcome {
    Translated(TranslatedMessage),
    Skipped,
    Failed(IngestError),
}

/// Batch ingest loop around a translator
pub struct IngestLoop {
    translator: Translator,
    batch_size: usize,
    max_batches: Option<usize>,
    pool: Option<rayon::ThreadPool>,
    shutdown: ShutdownHandle,
    /// Batches processed over all runs, for the batch limit
    batches_done: AtomicUsize,
}

impl IngestLoop {
    pub fn new(translator: Translator, batch_size: usize) -> Self {
        Self {
            translator,
            batch_size: batch_size.max(1),
            max_batches: None,
            pool: None,
            shutdown: ShutdownHandle::new(),
            batches_done: AtomicUsize::new(0),
        }
    }

    /// Builder method: stop after this many batches, counted across runs
    pub fn with_max_batches(mut self, max_batches: Option<usize>) -> Self {
        self.max_batches = max_batches;
        self
    }

    /// Builder method: translate on a dedicated pool of `threads` workers
    pub fn with_threads(mut self, threads: Option<usize>) -> Result<Self> {
        if let Some(threads) = threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build translation thread pool")?;
            self.pool = Some(pool);
        }
        Ok(self)
    }

    /// Handle that stops the loop between batches
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Drain a source into a sink until it is exhausted or the loop is closed
    ///
    /// Only source and sink I/O errors abort the run; message-level failures
    /// are logged and counted.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<IngestStats>
    where
        S: MessageSource + ?Sized,
        K: RecordSink + ?Sized,
    {
        let mut stats = IngestStats::new();
        log::info!("Consuming from {}", source.name());

        while self.shutdown.is_running() {
            let batch = source.poll(self.batch_size)?;
            if batch.is_empty() {
                if stats.messages > 0 {
                    log::debug!("No more messages from {}", source.name());
                }
                break;
            }

            log::debug!("Consuming {} message(s)", batch.len());
            stats.messages += batch.len();
            stats.batches += 1;

            for outcome in self.translate_batch(source.name(), batch) {
                match outcome {
                    Outcome::Translated(message) => {
                        sink.write(&message)?;
                        stats.record_translated(message.element_type);
                    }
                    Outcome::Skipped => stats.skipped += 1,
                    Outcome::Failed(e) => {
                        log::error!("Error processing consumed message: {}", e);
                        stats.failed += 1;
                    }
                }
            }

            let done = self.batches_done.fetch_add(1, Ordering::SeqCst) + 1;
            if self.max_batches.map_or(false, |max| done >= max) {
                log::info!("Reached batch limit ({}), stopping", done);
                self.shutdown.close();
            }
        }

        sink.flush()?;
        Ok(stats)
    }

    /// Translate one batch in parallel, preserving input order
    fn translate_batch(&self, source_name: &str, batch: Vec<Polled>) -> Vec<Outcome> {
        let work = || {
            batch
                .into_par_iter()
                .map(|polled| self.translate_one(source_name, polled))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    fn translate_one(&self, source_name: &str, polled: Polled) -> Outcome {
        let element = match polled.element {
            Ok(element) => element,
            Err(error) => {
                return Outcome::Failed(IngestError::Parse {
                    source_name: source_name.to_string(),
                    line: polled.line,
                    error,
                })
            }
        };

        match self.translator.translate(&element) {
            Ok(message) => Outcome::Translated(message),
            Err(TranslateError::Filtered(element_type)) => {
                log::trace!("Skipping filtered element {}", element_type);
                Outcome::Skipped
            }
            Err(error) => Outcome::Failed(IngestError::Translate {
                source_name: source_name.to_string(),
                line: polled.line,
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use j2735_translator::{ElementType, TranslatorConfig};
    use std::io::Cursor;

    const BRAKES: &str = r#"{"elementType":"BrakeSystemStatus","fields":{"wheelBrakes":[64],"traction":3,"abs":2,"scs":1,"brakeBoost":0,"auxBrakes":0}}"#;
    const BAD_CODE: &str = r#"{"elementType":"BrakeSystemStatus","fields":{"wheelBrakes":[64],"traction":9,"abs":2,"scs":1,"brakeBoost":0,"auxBrakes":0}}"#;
    const GEAR: &str = r#"{"elementType":"TransmissionState","timestampNs":1700000000000000000,"fields":{"transmission":2}}"#;

    fn source(lines: &[&str]) -> JsonLinesSource<Cursor<Vec<u8>>> {
        JsonLinesSource::new("test", Cursor::new(lines.join("\n").into_bytes()))
    }

    #[test]
    fn test_poll_batches_and_line_numbers() {
        let mut src = source(&[BRAKES, "", GEAR, "not json"]);

        let first = src.poll(2).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].line, 1);
        assert_eq!(first[1].line, 3);

        let second = src.poll(2).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].line, 4);
        assert!(matches!(second[0].element, Err(LineError::Json(_))));

        assert!(src.poll(2).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_is_a_message_failure() {
        let mut input = Vec::new();
        input.extend_from_slice(BRAKES.as_bytes());
        input.extend_from_slice(b"\n\xff\xfe\n");
        input.extend_from_slice(GEAR.as_bytes());
        input.push(b'\n');

        let mut polled = JsonLinesSource::new("bytes", Cursor::new(input.clone()))
            .poll(10)
            .unwrap();
        assert_eq!(polled.len(), 3);
        assert_eq!(polled[1].line, 2);
        assert!(matches!(polled.remove(1).element, Err(LineError::Utf8(_))));

        let ingest = IngestLoop::new(Translator::new(), 10);
        let mut src = JsonLinesSource::new("bytes", Cursor::new(input));
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        let stats = ingest.run(&mut src, &mut sink).unwrap();
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.translated, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(sink[0].element_type, ElementType::BrakeSystemStatus);
        assert_eq!(sink[1].element_type, ElementType::TransmissionState);
    }

    #[test]
    fn test_run_isolates_bad_messages() {
        let ingest = IngestLoop::new(Translator::new(), 2);
        let mut src = source(&[BRAKES, "{broken", BAD_CODE, GEAR, r#"{"elementType":"PathHistory"}"#]);
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        let stats = ingest.run(&mut src, &mut sink).unwrap();

        assert_eq!(stats.messages, 5);
        assert_eq!(stats.translated, 2);
        assert_eq!(stats.failed, 3);
        assert_eq!(stats.batches, 3);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].element_type, ElementType::BrakeSystemStatus);
        assert_eq!(sink[1].record.label("transmission"), Some("forwardGears"));
    }

    #[test]
    fn test_output_keeps_input_order() {
        let lines: Vec<&str> = (0..50).map(|i| if i % 2 == 0 { BRAKES } else { GEAR }).collect();
        let ingest = IngestLoop::new(Translator::new(), 16)
            .with_threads(Some(4))
            .unwrap();
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        ingest.run(&mut source(&lines), &mut sink).unwrap();

        assert_eq!(sink.len(), 50);
        for (i, message) in sink.iter().enumerate() {
            let expected = if i % 2 == 0 {
                ElementType::BrakeSystemStatus
            } else {
                ElementType::TransmissionState
            };
            assert_eq!(message.element_type, expected);
        }
    }

    #[test]
    fn test_filtered_messages_are_skipped() {
        let translator = Translator::with_config(
            TranslatorConfig::new().with_element_filter(vec![ElementType::TransmissionState]),
        );
        let ingest = IngestLoop::new(translator, 10);
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        let stats = ingest.run(&mut source(&[BRAKES, GEAR]), &mut sink).unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_max_batches_stops_between_batches() {
        let ingest = IngestLoop::new(Translator::new(), 2).with_max_batches(Some(1));
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        let stats = ingest
            .run(&mut source(&[BRAKES, GEAR, BRAKES, GEAR]), &mut sink)
            .unwrap();
        assert_eq!(stats.batches, 1);
        assert_eq!(sink.len(), 2);
        assert!(!ingest.shutdown_handle().is_running());
    }

    #[test]
    fn test_max_batches_spans_runs() {
        let ingest = IngestLoop::new(Translator::new(), 1).with_max_batches(Some(3));
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        let first = ingest.run(&mut source(&[BRAKES, GEAR]), &mut sink).unwrap();
        assert_eq!(first.batches, 2);
        assert!(ingest.shutdown_handle().is_running());

        let second = ingest.run(&mut source(&[GEAR, BRAKES]), &mut sink).unwrap();
        assert_eq!(second.batches, 1);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_closed_handle_stops_before_polling() {
        let ingest = IngestLoop::new(Translator::new(), 2);
        ingest.shutdown_handle().close();
        let mut sink: Vec<TranslatedMessage> = Vec::new();

        let stats = ingest.run(&mut source(&[BRAKES]), &mut sink).unwrap();
        assert_eq!(stats.batches, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_close_from_sink_finishes_current_batch() {
        struct ClosingSink {
            handle: ShutdownHandle,
            written: usize,
        }

        impl RecordSink for ClosingSink {
            fn write(&mut self, _message: &TranslatedMessage) -> Result<()> {
                self.written += 1;
                self.handle.close();
                Ok(())
            }
        }

        let ingest = IngestLoop::new(Translator::new(), 3);
        let mut sink = ClosingSink {
            handle: ingest.shutdown_handle(),
            written: 0,
        };

        let stats = ingest
            .run(&mut source(&[BRAKES, GEAR, BRAKES, GEAR, BRAKES]), &mut sink)
            .unwrap();
        assert_eq!(stats.batches, 1);
        assert_eq!(sink.written, 3);
    }

    #[test]
    fn test_json_lines_sink_output() {
        let ingest = IngestLoop::new(Translator::new(), 10);
        let mut sink = JsonLinesSink::new(Vec::new(), false);

        ingest.run(&mut source(&[GEAR, BRAKES]), &mut sink).unwrap();

        let text = String::from_utf8(sink.writer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["elementType"], "TransmissionState");
        assert_eq!(first["timestamp"], "2023-11-14T22:13:20Z");
        assert_eq!(first["record"]["transmission"], "forwardGears");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["record"]["wheelBrakes"]["leftFront"], true);
        assert_eq!(second["record"]["traction"], "engaged");
    }
}
