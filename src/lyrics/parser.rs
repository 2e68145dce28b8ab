pub const NO_LYRICS: &str = "No lyrics available";

#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track; `None` for untimed lines.
    pub time: Option<f64>,
    pub text: String,
}

impl LyricLine {
    fn sort_key(&self) -> f64 {
        self.time.unwrap_or(0.0)
    }
}

/// Parses LRC text into lines sorted by time. A line with several tags
/// yields one entry per tag. Never returns an empty list.
pub fn parse(raw: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();

    for raw_line in raw.lines() {
        let line = raw_line.replace('\r', "");
        let (times, text) = split_tags(&line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if times.is_empty() {
            lines.push(LyricLine {
                time: None,
                text: text.to_string(),
            });
        } else {
            lines.extend(times.into_iter().map(|t| LyricLine {
                time: Some(t),
                text: text.to_string(),
            }));
        }
    }

    lines.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));

    if lines.is_empty() {
        lines.push(LyricLine {
            time: None,
            text: NO_LYRICS.to_string(),
        });
    }
    lines
}

/// Removes every bracket group made of digits, `:` and `.` only, returning
/// the timestamps among them and the remaining text.
fn split_tags(line: &str) -> (Vec<f64>, String) {
    let mut times = Vec::new();
    let mut text = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        text.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find(']') {
            Some(close) if is_tag_body(&after_open[..close]) => {
                if let Some(t) = parse_timestamp(&after_open[..close]) {
                    times.push(t);
                }
                rest = &after_open[close + 1..];
            }
            _ => {
                text.push('[');
                rest = after_open;
            }
        }
    }
    text.push_str(rest);

    (times, text)
}

fn is_tag_body(body: &str) -> bool {
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit() || c == ':' || c == '.')
}

/// `mm:ss`, `mm:ss.f`, `mm:ss.ff` or `mm:ss.fff`.
fn parse_timestamp(tag: &str) -> Option<f64> {
    let (minutes, rest) = tag.split_once(':')?;
    let (seconds, fraction) = match rest.split_once('.') {
        Some((s, f)) => (s, Some(f)),
        None => (rest, None),
    };

    if minutes.is_empty() || seconds.is_empty() || seconds.len() > 2 {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;

    let fraction = match fraction {
        None => 0.0,
        Some(f) if (1..=3).contains(&f.len()) => {
            let value: u32 = f.parse().ok()?;
            value as f64 / 10f64.powi(f.len() as i32)
        }
        Some(_) => return None,
    };

    Some(minutes as f64 * 60.0 + seconds as f64 + fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(lines: &[LyricLine]) -> Vec<Option<f64>> {
        lines.iter().map(|l| l.time).collect()
    }

    #[test]
    fn lines_are_sorted_by_time() {
        let lines = parse("[00:01.50]Hello\n[00:00.00]Hi");
        assert_eq!(
            lines,
            vec![
                LyricLine {
                    time: Some(0.0),
                    text: "Hi".into()
                },
                LyricLine {
                    time: Some(1.5),
                    text: "Hello".into()
                },
            ]
        );
    }

    #[test]
    fn repeated_tags_emit_one_entry_each() {
        let lines = parse("[00:01.00][00:05.00]Repeat");
        assert_eq!(times(&lines), vec![Some(1.0), Some(5.0)]);
        assert!(lines.iter().all(|l| l.text == "Repeat"));
    }

    #[test]
    fn fraction_width_sets_the_unit() {
        let lines = parse("[00:01.5]a\n[00:02.05]b\n[00:03.005]c\n[01:00]d");
        assert_eq!(
            times(&lines),
            vec![Some(1.5), Some(2.05), Some(3.005), Some(60.0)]
        );
    }

    #[test]
    fn untimed_lines_keep_their_place_at_zero() {
        let lines = parse("[ar:Someone]\nPlain words\n[00:02.00]Timed\r\n[00:00.00]Start");
        assert_eq!(
            lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
            vec!["[ar:Someone]", "Plain words", "Start", "Timed"]
        );
        assert_eq!(lines[1].time, None);
    }

    #[test]
    fn empty_payloads_are_skipped_and_placeholder_fills_in() {
        assert_eq!(parse("[00:01.00]\n   \n[00:02.00]  "), vec![LyricLine {
            time: None,
            text: NO_LYRICS.into()
        }]);
        assert_eq!(parse("").len(), 1);
    }

    #[test]
    fn numeric_groups_that_are_not_timestamps_are_stripped() {
        let lines = parse("[1.2.3]odd");
        assert_eq!(lines, vec![LyricLine {
            time: None,
            text: "odd".into()
        }]);
    }
}
