/// One latency measurement extracted from a benchmark log line.
///
/// Units are already converted at parse time: latency nanoseconds to
/// milliseconds, message length bytes to kilobytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub frame: u64,
    pub object_count: u64,
    pub latency_ms: f64,
    pub size_kb: f64,
}
