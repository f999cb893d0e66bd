/// Text shown in a cell before its clue is revealed.
pub const PLACEHOLDER: &str = "?";

/// How much of a clue is showing. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    Question,
    Answer,
}

impl RevealState {
    pub fn next(self) -> Self {
        match self {
            Self::Hidden => Self::Question,
            Self::Question | Self::Answer => Self::Answer,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub question: String,
    pub answer: String,
    pub state: RevealState,
}

impl Clue {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            state: RevealState::Hidden,
        }
    }

    /// Advances the reveal state. Returns the new state, or `None` once the answer is showing.
    pub fn reveal(&mut self) -> Option<RevealState> {
        if self.state == RevealState::Answer {
            return None;
        }
        self.state = self.state.next();
        Some(self.state)
    }

    pub fn text(&self) -> &str {
        match self.state {
            RevealState::Hidden => PLACEHOLDER,
            RevealState::Question => &self.question,
            RevealState::Answer => &self.answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub title: String,
    pub clues: Vec<Clue>,
}

/// A board position. `col` picks the category, `row` the clue within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The categories currently in play. Either empty or replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    categories: Vec<Category>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.categories.clear();
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// True if the board holds exactly `num_categories` categories of `clues_per_category` clues.
    pub fn has_shape(&self, num_categories: usize, clues_per_category: usize) -> bool {
        self.categories.len() == num_categories
            && self
                .categories
                .iter()
                .all(|c| c.clues.len() == clues_per_category)
    }

    pub fn clue(&self, pos: CellPos) -> Option<&Clue> {
        self.categories.get(pos.col)?.clues.get(pos.row)
    }

    /// Runs one click on `pos` through the reveal state machine. Out-of-range positions and
    /// clues already showing their answer are left alone and return `None`.
    pub fn reveal(&mut self, pos: CellPos) -> Option<RevealState> {
        self.categories
            .get_mut(pos.col)?
            .clues
            .get_mut(pos.row)?
            .reveal()
    }

    pub fn cell_text(&self, pos: CellPos) -> &str {
        self.clue(pos).map(Clue::text).unwrap_or(PLACEHOLDER)
    }

    pub fn cell_state(&self, pos: CellPos) -> RevealState {
        self.clue(pos).map(|c| c.state).unwrap_or_default()
    }
}
