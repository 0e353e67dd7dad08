pub mod logger;

pub mod logging_defs;
#[macro_use]
pub mod macros;

use logger::PerfListener;
use logging_defs::*;
use std::time::Duration;
use std::time::Instant;

/// A [`PerfListener`] that prints span events to stderr.
///
/// Created by the page pipeline when [`crate::EnhanceOptions::debug`] is set.
/// `spans` restricts output to the listed span names (`"COPY_CODE"`, ...,
/// see [`logging_defs::name`]); an empty list means every span is reported.
pub struct PerfConsoleListener {
    pub spans: Vec<String>,
}

impl PerfListener for PerfConsoleListener {
    fn is_interested_in_span(&self, span_id: u64) -> bool {
        self.spans.is_empty() || self.spans.iter().any(|s| s.as_str() == name(span_id))
    }

    fn on_span_start(&self, span_id: u64, _start_time: Instant) {
        eprintln!("Start of span: {}", name(span_id));
    }

    fn on_check_point(
        &self,
        span_id: u64,
        _point_time: Instant,
        duration_since_last_checkpoint: Duration,
        point_label: &str,
    ) {
        eprintln!(
            "Span: \"{}\" point: \"{}\": {} seconds",
            name(span_id),
            point_label,
            duration_since_last_checkpoint.as_secs_f64()
        );
    }

    fn on_annotate(&self, span_id: u64, annotation: &str) {
        eprintln!("Span: \"{}\" annotation: \"{}\"", name(span_id), annotation);
    }

    fn on_span_end(&self, span_id: u64, span_duration: Duration) {
        eprintln!(
            "Span ended: \"{}\": {} seconds",
            name(span_id),
            span_duration.as_secs_f64()
        );
    }
}
