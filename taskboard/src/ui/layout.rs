//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

use taskboard_proto::task::Column;

/// Areas of the board screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// New-task input line.
    pub input: Rect,
    /// Pending column.
    pub pending: Rect,
    /// Done column.
    pub done: Rect,
    /// Comment panel of the selected task.
    pub comments: Rect,
    /// Status bar.
    pub status: Rect,
}

impl BoardLayout {
    /// Splits the terminal area into the board's panels.
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        Self {
            input: rows[0],
            pending: columns[0],
            done: columns[1],
            comments: rows[2],
            status: rows[3],
        }
    }

    /// Area of a column.
    #[must_use]
    pub const fn column(&self, column: Column) -> Rect {
        match column {
            Column::Pending => self.pending,
            Column::Done => self.done,
        }
    }

    /// Which column and row index lies under `pointer`.
    ///
    /// Rows start just inside the column border, one line per task.
    #[must_use]
    pub fn row_at(&self, pointer: Position) -> Option<(Column, usize)> {
        Column::ALL.into_iter().find_map(|column| {
            let inner = self.column(column).inner(ratatui::layout::Margin::new(1, 1));
            inner
                .contains(pointer)
                .then(|| (column, usize::from(pointer.y - inner.y)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_split_the_middle() {
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.pending.x, 0);
        assert_eq!(layout.done.x, 40);
        assert_eq!(layout.pending.y, 3);
        assert_eq!(layout.status.y, 29);
    }

    #[test]
    fn row_hit_test_skips_border() {
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.row_at(Position::new(5, 3)), None);
        assert_eq!(layout.row_at(Position::new(5, 4)), Some((Column::Pending, 0)));
        assert_eq!(layout.row_at(Position::new(45, 6)), Some((Column::Done, 2)));
        assert_eq!(layout.row_at(Position::new(5, 1)), None);
    }
}
