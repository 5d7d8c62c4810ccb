use thiserror::Error;

/// Errors surfaced by the board and move-application layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// FEN string rejected by the parser. The board is left unchanged.
    #[error("malformed FEN: {0}")]
    MalformedFen(String),

    /// Move is not in the legal set of the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// `undo_move` called with an empty undo stack.
    #[error("no move to undo")]
    NoMoveToUndo,

    /// Checked move-list access past the live prefix.
    #[error("move list index {index} out of range (size {size})")]
    OutOfRange { index: usize, size: usize },
}

pub type ChessResult<T> = Result<T, ChessError>;
