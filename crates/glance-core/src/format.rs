//! Content formatting for the main and expanded display surfaces.
//!
//! Everything here is pure: the only environmental input is the
//! [`ClockSample`] the caller takes right before rendering.
//!
//! Widths count characters, not display columns. The display font is
//! single-width, so no grapheme or East Asian width handling is done.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::config::DisplayConfig;
use crate::display::{DisplaySurface, NotificationRecord};

/// Characters per display line.
pub const LINE_WIDTH: usize = 22;

/// Rendered instead of a body when there is nothing to show.
pub const PLACEHOLDER: &str = "No notifications";

const HEADER_SEPARATOR: &str = " · ";

/// Wraps text into lines of at most `width` characters.
///
/// Words are separated by single spaces. A word longer than `width` is cut
/// into `width`-sized chunks before packing. Never returns an empty vector.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len: usize = 0;

    for word in text.split(' ').filter(|word| !word.is_empty()) {
        for chunk in split_chunks(word, width) {
            let chunk_len = chunk.chars().count();
            if current.is_empty() {
                current = chunk;
                current_len = chunk_len;
            } else if current_len + 1 + chunk_len <= width {
                current.push(' ');
                current.push_str(&chunk);
                current_len += 1 + chunk_len;
            } else {
                lines.push(std::mem::replace(&mut current, chunk));
                current_len = chunk_len;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Splits a word into consecutive chunks of `width` characters (last may be shorter).
fn split_chunks(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// First `width` characters of `text`; `None` is treated as empty.
pub fn truncate(text: Option<&str>, width: usize) -> String {
    text.unwrap_or_default().chars().take(width).collect()
}

/// Returns `rows` lines starting at `offset`, wrapping around the end.
///
/// Row `i` is `lines[(offset + i) % lines.len()]`, so rows repeat when
/// `rows > lines.len()`. An empty slice is treated as a single empty line.
pub fn paginate(lines: &[String], offset: u64, rows: usize) -> Vec<String> {
    if lines.is_empty() {
        return vec![String::new(); rows];
    }

    let len = lines.len();
    let start = (offset % len as u64) as usize;
    (0..rows)
        .map(|i| lines[(start + i) % len].clone())
        .collect()
}

/// Time and date strings sampled once per render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSample {
    /// 24-hour `HH:MM`.
    pub time: String,
    /// Short weekday, month and day, e.g. `Sun, Oct 18`.
    pub date: String,
}

impl ClockSample {
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            time: at.format("%H:%M").to_string(),
            date: at.format("%a, %b %-d").to_string(),
        }
    }
}

/// Where body text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// The latest phone notification (placeholder when there is none).
    Notifications,
    /// A fixed configured message; notifications are tracked but not shown.
    Fixed(String),
}

/// Row counts and text for one deployment's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub line_width: usize,
    pub main_rows: usize,
    pub expanded_rows: usize,
    pub placeholder: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            line_width: LINE_WIDTH,
            main_rows: 2,
            expanded_rows: 4,
            placeholder: PLACEHOLDER.to_string(),
        }
    }
}

impl Layout {
    pub fn rows(&self, surface: DisplaySurface) -> usize {
        match surface {
            DisplaySurface::Main => self.main_rows,
            DisplaySurface::Expanded => self.expanded_rows,
        }
    }
}

/// Renders text blocks for a display surface.
#[derive(Debug, Clone)]
pub struct Formatter {
    layout: Layout,
    source: ContentSource,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(Layout::default(), ContentSource::Notifications)
    }
}

impl Formatter {
    pub fn new(layout: Layout, source: ContentSource) -> Self {
        Self { layout, source }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        let layout = Layout {
            line_width: config.line_width.max(1),
            main_rows: config.main_rows,
            expanded_rows: config.expanded_rows,
            placeholder: config.placeholder.clone(),
        };
        let source = config
            .fixed_message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map_or(ContentSource::Notifications, |message| {
                ContentSource::Fixed(message.to_string())
            });
        Self::new(layout, source)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Renders one block: header fields, then paginated body rows.
    pub fn format(
        &self,
        surface: DisplaySurface,
        notification: Option<&NotificationRecord>,
        offset: u64,
        clock: &ClockSample,
    ) -> String {
        let width = self.layout.line_width;
        let mut out = Vec::new();

        let (title_line, body) = match (&self.source, notification) {
            (ContentSource::Fixed(message), _) => (None, Some(message.as_str())),
            (ContentSource::Notifications, Some(record)) => {
                (Some(record), Some(record.content.as_str()))
            }
            (ContentSource::Notifications, None) => (None, None),
        };

        match surface {
            DisplaySurface::Main => {
                let header = match title_line {
                    Some(record) => format!("{}{HEADER_SEPARATOR}{}", clock.time, record.title),
                    None => clock.time.clone(),
                };
                out.push(truncate(Some(&header), width));
            }
            DisplaySurface::Expanded => {
                let header = format!("{}{HEADER_SEPARATOR}{}", clock.time, clock.date);
                out.push(truncate(Some(&header), width));
                if let Some(record) = title_line {
                    let title = if record.app.is_empty() {
                        record.title.clone()
                    } else {
                        format!("{}: {}", record.app, record.title)
                    };
                    out.push(truncate(Some(&title), width));
                }
            }
        }

        match body {
            Some(text) => {
                let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
                let lines = wrap_lines(&normalized, width);
                out.extend(paginate(&lines, offset, self.layout.rows(surface)));
            }
            None => out.push(self.layout.placeholder.clone()),
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn clock() -> ClockSample {
        ClockSample {
            time: "09:05".to_string(),
            date: "Sun, Oct 18".to_string(),
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_wrap_empty_input_yields_one_empty_line() {
        assert_eq!(wrap_lines("", LINE_WIDTH), vec![String::new()]);
    }

    #[test]
    fn test_wrap_long_word_is_chunked() {
        let word = "a".repeat(50);
        assert_eq!(
            wrap_lines(&word, 22),
            vec!["a".repeat(22), "a".repeat(22), "a".repeat(6)]
        );
    }

    #[test]
    fn test_wrap_packs_greedily() {
        assert_eq!(
            wrap_lines("Hello there friend how are you doing", 22),
            lines(&["Hello there friend how", "are you doing"])
        );
    }

    #[test]
    fn test_wrap_exact_fit_stays_on_one_line() {
        // 10 + 1 + 11 = 22
        assert_eq!(
            wrap_lines("abcdefghij klmnopqrstu", 22),
            lines(&["abcdefghij klmnopqrstu"])
        );
    }

    #[test]
    fn test_wrap_long_word_chunks_pack_with_neighbours() {
        // The short tail of a chunked word shares a line with the next word.
        assert_eq!(
            wrap_lines("hi abcdefgh xy", 4),
            lines(&["hi", "abcd", "efgh", "xy"])
        );
        assert_eq!(wrap_lines("abcde f", 4), lines(&["abcd", "e f"]));
    }

    #[test]
    fn test_wrap_lines_respect_width_and_preserve_words() {
        let text = "the quick brown fox jumps over the lazy dog while \
                    supercalifragilisticexpialidocious words keep going";
        for width in [1, 3, 7, 10, 22, 40] {
            let wrapped = wrap_lines(text, width);
            assert!(wrapped.iter().all(|line| line.chars().count() <= width));
            if width >= 34 {
                let rejoined = wrapped.join(" ");
                assert_eq!(rejoined, text);
            }
            let joined: String = wrapped.concat().chars().filter(|c| *c != ' ').collect();
            let expected: String = text.chars().filter(|c| *c != ' ').collect();
            assert_eq!(joined, expected);
        }
    }

    #[test]
    fn test_wrap_skips_repeated_spaces() {
        assert_eq!(wrap_lines("a  b", 22), lines(&["a b"]));
    }

    #[test]
    fn test_truncate_handles_none_and_short_text() {
        assert_eq!(truncate(None, 5), "");
        assert_eq!(truncate(Some("Hi"), 5), "Hi");
        assert_eq!(truncate(Some("Hello world"), 5), "Hello");
    }

    #[test]
    fn test_paginate_rows_follow_modulo_rule() {
        let source = lines(&["a", "b", "c"]);
        for offset in 0..10u64 {
            for rows in 0..7usize {
                let page = paginate(&source, offset, rows);
                assert_eq!(page.len(), rows);
                for (i, row) in page.iter().enumerate() {
                    assert_eq!(row, &source[(offset as usize + i) % source.len()]);
                }
            }
        }
    }

    #[test]
    fn test_paginate_full_rotation_is_identity() {
        let source = lines(&["one", "two", "three", "four"]);
        for offset in 0..8u64 {
            assert_eq!(
                paginate(&source, offset, 3),
                paginate(&source, offset + source.len() as u64, 3)
            );
        }
    }

    #[test]
    fn test_paginate_single_line_repeats() {
        let source = lines(&["only"]);
        assert_eq!(paginate(&source, 7, 3), lines(&["only", "only", "only"]));
    }

    #[test]
    fn test_paginate_large_offset_does_not_overflow() {
        let source = lines(&["a", "b", "c"]);
        assert_eq!(paginate(&source, u64::MAX, 1), lines(&["a"]));
    }

    #[test]
    fn test_format_without_notification_renders_placeholder() {
        let formatter = Formatter::default();
        assert_eq!(
            formatter.format(DisplaySurface::Main, None, 0, &clock()),
            "09:05\nNo notifications"
        );
        assert_eq!(
            formatter.format(DisplaySurface::Expanded, None, 3, &clock()),
            "09:05 · Sun, Oct 18\nNo notifications"
        );
    }

    #[test]
    fn test_format_main_notification() {
        let formatter = Formatter::default();
        let record = NotificationRecord::new("Msg", "Hi", "Hello there friend");
        assert_eq!(
            formatter.format(DisplaySurface::Main, Some(&record), 0, &clock()),
            "09:05 · Hi\nHello there friend\nHello there friend"
        );
    }

    #[test]
    fn test_format_expanded_notification_scrolls() {
        let formatter = Formatter::default();
        let record = NotificationRecord::new(
            "Msg",
            "A very long title that will not fit",
            "one two three four five six seven eight nine ten eleven twelve",
        );
        let wrapped = wrap_lines(&record.content, LINE_WIDTH);
        assert_eq!(wrapped.len(), 3);

        let rendered = formatter.format(DisplaySurface::Expanded, Some(&record), 1, &clock());
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows[0], "09:05 · Sun, Oct 18");
        assert_eq!(rows[1], "Msg: A very long title");
        assert_eq!(rows.len(), 2 + 4);
        assert_eq!(rows[2], wrapped[1]);
        assert_eq!(rows[3], wrapped[2]);
        assert_eq!(rows[4], wrapped[0]);
        assert_eq!(rows[5], wrapped[1]);
    }

    #[test]
    fn test_format_offset_reduces_modulo_wrapped_len() {
        let formatter = Formatter::default();
        let record = NotificationRecord::new("", "", "alpha beta gamma delta epsilon zeta eta");
        let len = wrap_lines(&record.content, LINE_WIDTH).len() as u64;
        assert_eq!(
            formatter.format(DisplaySurface::Main, Some(&record), 6, &clock()),
            formatter.format(DisplaySurface::Main, Some(&record), 6 % len, &clock())
        );
    }

    #[test]
    fn test_format_normalizes_newlines_in_body() {
        let formatter = Formatter::default();
        let record = NotificationRecord::new("", "t", "line one\nline two");
        let rendered = formatter.format(DisplaySurface::Main, Some(&record), 0, &clock());
        assert_eq!(rendered, "09:05 · t\nline one line two\nline one line two");
    }

    #[test]
    fn test_format_fixed_source_ignores_notification() {
        let layout = Layout {
            main_rows: 1,
            ..Layout::default()
        };
        let formatter = Formatter::new(layout, ContentSource::Fixed("Hello from G1!".to_string()));
        let record = NotificationRecord::new("Msg", "Hi", "ignored");
        assert_eq!(
            formatter.format(DisplaySurface::Main, Some(&record), 0, &clock()),
            "09:05\nHello from G1!"
        );
    }

    #[test]
    fn test_from_config_blank_fixed_message_uses_notifications() {
        let config = DisplayConfig {
            fixed_message: Some("   ".to_string()),
            ..DisplayConfig::default()
        };
        assert_eq!(
            Formatter::from_config(&config).source(),
            &ContentSource::Notifications
        );
    }

    #[test]
    fn test_clock_sample_formats_time_and_date() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .and_then(|d| d.and_hms_opt(7, 4, 0))
            .unwrap()
            .and_utc();
        let sample = ClockSample::from_datetime::<Utc>(&at);
        assert_eq!(sample.time, "07:04");
        assert_eq!(sample.date, "Sun, Oct 18");
    }
}
