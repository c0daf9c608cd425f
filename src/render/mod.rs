//! Derived artifacts: subtitles and charts.

pub mod chart;
pub mod srt;
