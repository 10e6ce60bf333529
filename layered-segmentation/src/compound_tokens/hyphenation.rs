//! Detection of hyphen-joined token runs such as `vää-ää-ääga` or `kesk-`.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyphenState {
    /// Not inside a run.
    Idle,
    /// The last token was a `-` attached to the token before it.
    SawHyphen,
    /// The last token was attached to a preceding `-`.
    SawSecond,
}

/// How a token relates to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// A `-` starting exactly where the previous token ends.
    AdjacentHyphen,
    /// Any other token starting exactly where the previous token ends.
    AdjacentWord,
    /// A token separated from the previous one, or the first token.
    Detached,
}

impl TokenClass {
    pub fn of(token: &str, adjacent: bool) -> Self {
        match (adjacent, token == "-") {
            (false, _) => TokenClass::Detached,
            (true, true) => TokenClass::AdjacentHyphen,
            (true, false) => TokenClass::AdjacentWord,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The run so far is abandoned; a new one may start at this token.
    Restart,
    /// The token joins the current run.
    Extend,
    /// The run ended before this token.
    Close,
}

pub fn transition(state: HyphenState, class: TokenClass) -> (HyphenState, Action) {
    use HyphenState::*;
    use TokenClass::*;

    match (state, class) {
        (Idle, AdjacentHyphen) => (SawHyphen, Action::Extend),
        (Idle, _) => (Idle, Action::Restart),
        (SawHyphen, AdjacentWord) => (SawSecond, Action::Extend),
        (SawHyphen, _) => (Idle, Action::Close),
        (SawSecond, AdjacentHyphen) => (SawHyphen, Action::Extend),
        (SawSecond, _) => (Idle, Action::Close),
    }
}

/// Feeds token classes through [`transition`] and reports finished runs as
/// token index ranges.
#[derive(Debug, Clone)]
pub struct HyphenationScanner {
    state: HyphenState,
    run_start: usize,
}

impl Default for HyphenationScanner {
    fn default() -> Self {
        HyphenationScanner {
            state: HyphenState::Idle,
            run_start: 0,
        }
    }
}

impl HyphenationScanner {
    pub fn state(&self) -> HyphenState {
        self.state
    }

    /// Process token `index`. Returns the run that ended just before it.
    pub fn feed(&mut self, index: usize, class: TokenClass) -> Option<Range<usize>> {
        let (next, action) = transition(self.state, class);
        self.state = next;
        match action {
            Action::Extend => None,
            Action::Restart => {
                self.run_start = index;
                None
            }
            Action::Close => {
                let run = self.run_start..index;
                self.run_start = index;
                Some(run).filter(|run| run.len() >= 2)
            }
        }
    }

    /// End of input: flush a run still open after `token_count` tokens.
    pub fn finish(&mut self, token_count: usize) -> Option<Range<usize>> {
        let open = self.state != HyphenState::Idle;
        self.state = HyphenState::Idle;
        let run = self.run_start..token_count;
        self.run_start = token_count;
        Some(run).filter(|run| open && run.len() >= 2)
    }
}
