use crate::config::GameConfig;
use crate::error::TriviaError;
use crate::model::{Board, Category, CellPos, RevealState};

/// Identifies one start/reset cycle. Results for anything but the latest round are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// The timed steps run after a board has been fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingStep {
    HideLoading,
    RevealBoard,
}

/// Returns the steps in the order they fire, each paired with the wait (in ms) since the
/// previous one.
pub fn pacing_schedule(config: &GameConfig) -> Vec<(u32, PacingStep)> {
    let mut steps = vec![
        (config.hide_loading_after_ms, PacingStep::HideLoading),
        (config.reveal_board_after_ms, PacingStep::RevealBoard),
    ];
    steps.sort_by_key(|(at, _)| *at);

    let mut elapsed = 0;
    steps
        .into_iter()
        .map(|(at, step)| {
            let wait = at - elapsed;
            elapsed = at;
            (wait, step)
        })
        .collect()
}

/// Owns the board and drives the Idle -> Loading -> Ready cycle.
#[derive(Debug, Clone)]
pub struct GameController {
    config: GameConfig,
    board: Board,
    phase: GamePhase,
    loading_visible: bool,
    round: u64,
}

impl GameController {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            board: Board::new(),
            phase: GamePhase::Idle,
            loading_visible: false,
            round: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn board_visible(&self) -> bool {
        self.phase == GamePhase::Ready
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.phase {
            GamePhase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Label for the start/reset control, or `None` while it should be hidden.
    pub fn control_label(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Idle => Some("Start"),
            GamePhase::Loading => None,
            GamePhase::Ready => Some("Reset"),
            GamePhase::Failed(_) => Some("Retry"),
        }
    }

    /// Clears the board and enters `Loading`. Refuses while a round is already loading.
    pub fn begin_round(&mut self) -> Option<RoundId> {
        if self.phase == GamePhase::Loading {
            return None;
        }
        self.round += 1;
        self.board.reset();
        self.phase = GamePhase::Loading;
        self.loading_visible = false;
        Some(RoundId(self.round))
    }

    fn is_current(&self, round: RoundId) -> bool {
        round.0 == self.round && self.phase == GamePhase::Loading
    }

    /// Installs a fully fetched board and shows the loading indicator. A board of the wrong
    /// shape fails the round instead.
    pub fn commit(&mut self, round: RoundId, categories: Vec<Category>) -> bool {
        if !self.is_current(round) {
            return false;
        }
        let (num_categories, clues_per_category) =
            (self.config.num_categories, self.config.clues_per_category);
        self.board.set_categories(categories);
        if !self.board.has_shape(num_categories, clues_per_category) {
            let err = TriviaError::MalformedPayload(format!(
                "expected {} categories of {} clues",
                num_categories, clues_per_category
            ));
            self.fail(round, &err);
            return false;
        }
        self.loading_visible = true;
        true
    }

    /// Hides the loading indicator for `round`. Repeating it is harmless; timers from an
    /// earlier round are ignored.
    pub fn hide_loading(&mut self, round: RoundId) -> bool {
        if !self.is_current(round) {
            return false;
        }
        self.loading_visible = false;
        true
    }

    pub fn reveal_board(&mut self, round: RoundId) -> bool {
        if !self.is_current(round) || self.board.is_empty() {
            return false;
        }
        self.loading_visible = false;
        self.phase = GamePhase::Ready;
        true
    }

    pub fn fail(&mut self, round: RoundId, err: &TriviaError) -> bool {
        if !self.is_current(round) {
            return false;
        }
        self.board.reset();
        self.loading_visible = false;
        self.phase = GamePhase::Failed(err.to_string());
        true
    }

    /// Handles a click on a clue cell. Ignored unless the board is showing.
    pub fn click(&mut self, pos: CellPos) -> Option<RevealState> {
        if !self.board_visible() {
            return None;
        }
        self.board.reveal(pos)
    }

    pub fn cell_text(&self, pos: CellPos) -> String {
        self.board.cell_text(pos).to_string()
    }
}
