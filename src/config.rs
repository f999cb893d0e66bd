use serde::{Deserialize, Serialize};

use crate::error::TriviaError;

/// Tunables for a game. Every field has a default, so a partial JSON document deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Base URL of the trivia provider, with a trailing slash.
    pub api_base: String,
    /// How many candidate categories to request before sampling.
    pub category_pool_size: usize,
    pub num_categories: usize,
    /// Clues sampled per category. Only `rows_shown` of them are put on the board.
    pub clues_per_category: usize,
    pub rows_shown: usize,
    pub hide_loading_after_ms: u32,
    pub reveal_board_after_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_base: "https://jservice.io/api/".to_string(),
            category_pool_size: 100,
            num_categories: 6,
            clues_per_category: 6,
            rows_shown: 5,
            hide_loading_after_ms: 1000,
            reveal_board_after_ms: 1250,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), TriviaError> {
        if self.num_categories == 0 || self.clues_per_category == 0 || self.rows_shown == 0 {
            return Err(TriviaError::InvalidConfig(
                "board dimensions must be non-zero".to_string(),
            ));
        }
        if self.rows_shown > self.clues_per_category {
            return Err(TriviaError::InvalidConfig(format!(
                "cannot show {} rows with {} clues per category",
                self.rows_shown, self.clues_per_category
            )));
        }
        if self.num_categories > self.category_pool_size {
            return Err(TriviaError::InvalidConfig(format!(
                "cannot pick {} categories from a pool of {}",
                self.num_categories, self.category_pool_size
            )));
        }
        Ok(())
    }

    pub fn categories_url(&self, count: usize) -> String {
        format!("{}categories?count={}", self.api_base, count)
    }

    pub fn category_url(&self, id: u64) -> String {
        format!("{}category?id={}", self.api_base, id)
    }
}
