/// Status line: the rules engine's stage message, shown verbatim.

use crate::domain::snapshot::GameSnapshot;

#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    text: String,
}

impl StatusLine {
    pub fn render(snapshot: &GameSnapshot) -> String {
        snapshot.stage_message.clone()
    }

    /// Store the snapshot's message. Returns true if the text changed.
    pub fn refresh(&mut self, snapshot: &GameSnapshot) -> bool {
        if self.text == snapshot.stage_message {
            return false;
        }
        self.text = Self::render(snapshot);
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_message(msg: &str) -> GameSnapshot {
        GameSnapshot { stage_message: msg.into(), ..GameSnapshot::default() }
    }

    #[test]
    fn render_is_verbatim() {
        let s = with_message("  Player 1: move worker 2  ");
        assert_eq!(StatusLine::render(&s), "  Player 1: move worker 2  ");
    }

    #[test]
    fn refresh_reports_changes_only() {
        let mut line = StatusLine::default();
        assert!(line.refresh(&with_message("a")));
        assert!(!line.refresh(&with_message("a")));
        assert!(line.refresh(&with_message("b")));
        assert_eq!(line.text(), "b");
    }
}
