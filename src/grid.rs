//! Layout of the rendered table: which cells exist and what they are called in the DOM.

use crate::model::{Board, CellPos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub dom_id: String,
    pub title: String,
}

pub fn header_dom_id(col: usize) -> String {
    format!("category-{col}")
}

pub fn cell_dom_id(pos: CellPos) -> String {
    format!("clue-{}-{}", pos.row, pos.col)
}

/// One header cell per category, in board order.
pub fn header_cells(board: &Board) -> Vec<HeaderCell> {
    board
        .categories()
        .iter()
        .enumerate()
        .map(|(col, category)| HeaderCell {
            dom_id: header_dom_id(col),
            title: category.title.clone(),
        })
        .collect()
}

/// `rows` rows of `cols` positions each.
pub fn body_rows(rows: usize, cols: usize) -> Vec<Vec<CellPos>> {
    (0..rows)
        .map(|row| (0..cols).map(|col| CellPos::new(row, col)).collect())
        .collect()
}
