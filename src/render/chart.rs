//! Word-count-per-minute bar chart.
//!
//! The artifact is a single self-contained HTML page with an inline SVG, so
//! it opens in any browser without network access.

use crate::error::{DgscribeError, Result};
use crate::stt::transcript::TranscriptionResult;
use std::fs;
use std::path::Path;

const BAR_WIDTH: u32 = 24;
const BAR_GAP: u32 = 6;
const PLOT_HEIGHT: u32 = 240;
const MARGIN: u32 = 40;

/// Words spoken in each one-minute bucket of the media.
///
/// There are `trunc(duration / 60) + 1` buckets, or a single one when the
/// duration is unusable. Words timestamped past the reported duration land
/// in the last bucket.
pub fn word_count_series(result: &TranscriptionResult) -> Vec<usize> {
    let minutes = match result.checked_duration() {
        Ok(duration) => ((duration / 60.0).trunc() as usize).saturating_add(1),
        Err(_) => 1,
    };

    let mut counts = vec![0usize; minutes];
    for word in result.primary_words() {
        let minute = if word.start.is_finite() && word.start > 0.0 {
            (word.start / 60.0) as usize
        } else {
            0
        };
        counts[minute.min(minutes - 1)] += 1;
    }
    counts
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the bar chart page for `series` with `title` as the heading.
pub fn render_html(title: &str, series: &[usize]) -> String {
    let title = escape_html(title);
    let max = series.iter().copied().max().unwrap_or(0).max(1);
    let width = MARGIN * 2 + series.len() as u32 * (BAR_WIDTH + BAR_GAP);
    let height = PLOT_HEIGHT + MARGIN * 2;
    let baseline = MARGIN + PLOT_HEIGHT;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"{width}\" height=\"{height}\" role=\"img\">\n"
    ));
    svg.push_str(&format!(
        "<line x1=\"{MARGIN}\" y1=\"{baseline}\" \
         x2=\"{}\" y2=\"{baseline}\" stroke=\"#333\"/>\n",
        width - MARGIN
    ));
    for (minute, &count) in series.iter().enumerate() {
        let bar_height = (count as u64 * u64::from(PLOT_HEIGHT) / max as u64) as u32;
        let x = MARGIN + minute as u32 * (BAR_WIDTH + BAR_GAP);
        let y = baseline - bar_height;
        svg.push_str(&format!(
            "<rect x=\"{x}\" y=\"{y}\" \
             width=\"{BAR_WIDTH}\" height=\"{bar_height}\" fill=\"#5470c6\">\
             <title>minute {minute}: {count} words</title></rect>\n"
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" text-anchor=\"middle\">{minute}</text>\n",
            x + BAR_WIDTH / 2,
            baseline + 14
        ));
    }
    svg.push_str("</svg>\n");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n\
         <body>\n<h1>{title}</h1>\n<p>Words per minute of media</p>\n{svg}</body>\n</html>\n"
    )
}

/// Writes the chart for `result` to `path`, creating the parent directory.
pub fn write_chart(path: &Path, title: &str, result: &TranscriptionResult) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| DgscribeError::persistence(parent, e))?;
    }
    let html = render_html(title, &word_count_series(result));
    fs::write(path, html).map_err(|e| DgscribeError::persistence(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::transcript::fixtures::transcript;
    use tempfile::TempDir;

    #[test]
    fn test_series_has_one_bucket_per_started_minute() {
        assert_eq!(word_count_series(&transcript(0, 59.0)).len(), 1);
        assert_eq!(word_count_series(&transcript(0, 60.0)).len(), 2);
        assert_eq!(word_count_series(&transcript(0, 150.0)).len(), 3);
    }

    #[test]
    fn test_series_counts_words_by_start_minute() {
        // 120 words over 120s: one word every second
        let series = word_count_series(&transcript(120, 120.0));
        assert_eq!(series, vec![60, 60, 0]);
    }

    #[test]
    fn test_late_words_land_in_last_bucket() {
        let mut t = transcript(2, 30.0);
        t.results.channels[0].alternatives[0].words[1].start = 600.0;
        assert_eq!(word_count_series(&t), vec![2]);
    }

    #[test]
    fn test_zero_duration_still_has_a_bucket() {
        assert_eq!(word_count_series(&transcript(3, 0.0)), vec![3]);
    }

    #[test]
    fn test_implausible_duration_gets_one_bucket() {
        assert_eq!(word_count_series(&transcript(4, 1e300)), vec![4]);
        assert_eq!(word_count_series(&transcript(4, 1e12)), vec![4]);
    }

    #[test]
    fn test_html_escapes_title_and_draws_bars() {
        let html = render_html("a<b>&c", &[3, 0, 5]);
        assert!(html.contains("<title>a&lt;b&gt;&amp;c</title>"));
        assert_eq!(html.matches("<rect").count(), 3);
        assert!(html.contains("minute 2: 5 words"));
    }

    #[test]
    fn test_write_chart_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".graphs/talk_graph.html");

        write_chart(&path, "talk.mp4", &transcript(10, 60.0)).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("talk.mp4"));
    }
}
