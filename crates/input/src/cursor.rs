//! Column cursor for keyboard play.

use crate::types::GameAction;

/// What the frontend should do after feeding an action to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Only the cursor moved (or nothing happened).
    None,
    /// Spawn into this column.
    Drop(usize),
    Restart,
}

/// Selected column, clamped to `0..columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCursor {
    column: usize,
    columns: usize,
}

impl ColumnCursor {
    /// Create a cursor over `columns` columns, starting at the leftmost one.
    pub fn new(columns: usize) -> Self {
        Self {
            column: 0,
            columns: columns.max(1),
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Apply an action. Direct drops also move the cursor to their column;
    /// out-of-range direct drops are passed through for the session to reject.
    pub fn apply(&mut self, action: GameAction) -> CursorCommand {
        match action {
            GameAction::MoveLeft => {
                self.column = self.column.saturating_sub(1);
                CursorCommand::None
            }
            GameAction::MoveRight => {
                self.column = (self.column + 1).min(self.columns - 1);
                CursorCommand::None
            }
            GameAction::Drop => CursorCommand::Drop(self.column),
            GameAction::DropAt(column) => {
                let column = column as usize;
                if column < self.columns {
                    self.column = column;
                }
                CursorCommand::Drop(column)
            }
            GameAction::Restart => CursorCommand::Restart,
        }
    }
}
