use super::parser::{self, LyricLine};

pub const WINDOW_SIZE: usize = 5;
const WINDOW_LEAD: usize = 2;

/// Parsed lyrics plus the line that matches the playback position.
#[derive(Debug, Clone, Default)]
pub struct LyricsSync {
    lines: Vec<LyricLine>,
    active: Option<usize>,
}

impl LyricsSync {
    pub fn new(lines: Vec<LyricLine>) -> Self {
        Self {
            lines,
            active: None,
        }
    }

    pub fn from_lrc(raw: &str) -> Self {
        Self::new(parser::parse(raw))
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Recomputes the active line for `position` seconds. Returns `true` only
    /// when it moved.
    pub fn update(&mut self, position: f64) -> bool {
        let next = active_index(&self.lines, position);
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }

    /// First index of the visible window and the lines in it.
    pub fn window(&self) -> (usize, &[LyricLine]) {
        let start = self
            .active
            .map(|i| i.saturating_sub(WINDOW_LEAD))
            .unwrap_or(0)
            .min(self.lines.len());
        let end = (start + WINDOW_SIZE).min(self.lines.len());
        (start, &self.lines[start..end])
    }
}

/// Last timed line at or before `position`, skipping untimed ones.
pub fn active_index(lines: &[LyricLine], position: f64) -> Option<usize> {
    let mut found = None;
    for (i, line) in lines.iter().enumerate() {
        let Some(time) = line.time else {
            continue;
        };
        if time > position {
            break;
        }
        found = Some(i);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(times: &[f64]) -> Vec<LyricLine> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| LyricLine {
                time: Some(*t),
                text: format!("line {i}"),
            })
            .collect()
    }

    #[test]
    fn active_line_tracks_position() {
        let lines = timed(&[0.0, 1.5]);
        assert_eq!(active_index(&lines, 0.9), Some(0));
        assert_eq!(active_index(&lines, 1.6), Some(1));

        let lines = timed(&[2.0, 3.0]);
        assert_eq!(active_index(&lines, 1.0), None);
    }

    #[test]
    fn untimed_lines_are_never_active() {
        let mut lines = timed(&[1.0]);
        lines.insert(
            0,
            LyricLine {
                time: None,
                text: "credits".into(),
            },
        );
        assert_eq!(active_index(&lines, 0.5), None);
        assert_eq!(active_index(&lines, 5.0), Some(1));
    }

    #[test]
    fn update_reports_only_changes() {
        let mut sync = LyricsSync::new(timed(&[0.0, 1.5, 3.0]));
        assert!(sync.update(0.1));
        assert!(!sync.update(0.2));
        assert!(sync.update(1.5));
        assert_eq!(sync.active(), Some(1));
    }

    #[test]
    fn window_leads_the_active_line_by_two() {
        let mut sync = LyricsSync::new(timed(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        let (start, lines) = sync.window();
        assert_eq!((start, lines.len()), (0, 5));

        sync.update(1.0);
        assert_eq!(sync.window().0, 0);

        sync.update(5.5);
        let (start, lines) = sync.window();
        assert_eq!(start, 3);
        assert_eq!(lines[2].text, "line 5");

        sync.update(7.0);
        let (start, lines) = sync.window();
        assert_eq!((start, lines.len()), (5, 3));
    }
}
