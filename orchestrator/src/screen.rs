//! The three screens of the application and the legal moves between them.

use std::fmt;

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Collecting paths and options
    #[default]
    Form,
    /// A submitted backup is running
    Progress,
    /// The session ended, successfully or not
    Complete,
}

impl Screen {
    /// True for the moves the state machine allows.
    ///
    /// `Form -> Progress` (submit), `Progress -> Complete` (completion or
    /// rejected submission) and `Complete -> Form` (reset). Staying put is
    /// not a transition.
    pub fn can_transition_to(self, next: Screen) -> bool {
        matches!(
            (self, next),
            (Screen::Form, Screen::Progress)
                | (Screen::Progress, Screen::Complete)
                | (Screen::Complete, Screen::Form)
        )
    }

    /// Path and source-set edits are only meaningful on the form.
    pub fn accepts_form_edits(self) -> bool {
        self == Screen::Form
    }

    /// Engine notifications only apply while a session is running.
    pub fn accepts_engine_events(self) -> bool {
        self == Screen::Progress
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Form => write!(f, "form"),
            Screen::Progress => write!(f, "progress"),
            Screen::Complete => write!(f, "complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Screen; 3] = [Screen::Form, Screen::Progress, Screen::Complete];

    #[test]
    fn test_exactly_three_edges() {
        let edges: Vec<_> = ALL
            .iter()
            .flat_map(|a| ALL.iter().map(move |b| (*a, *b)))
            .filter(|(a, b)| a.can_transition_to(*b))
            .collect();
        assert_eq!(
            edges,
            vec![
                (Screen::Form, Screen::Progress),
                (Screen::Progress, Screen::Complete),
                (Screen::Complete, Screen::Form),
            ]
        );
    }

    #[test]
    fn test_form_cannot_jump_to_complete() {
        assert!(!Screen::Form.can_transition_to(Screen::Complete));
        assert!(!Screen::Progress.can_transition_to(Screen::Form));
    }

    #[test]
    fn test_default_is_form() {
        assert_eq!(Screen::default(), Screen::Form);
    }
}
