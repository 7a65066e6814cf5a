//! Projection of the annotation library onto a button grid.

/// One button position in the annotation grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub name: String,
    pub row: usize,
    pub col: usize,
    pub active: bool,
}

/// Lay names out row by row, `columns` per row, in the order given.
pub fn layout_grid<'a, I, F>(names: I, columns: usize, is_active: F) -> Vec<GridCell>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> bool,
{
    let columns = columns.max(1);
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| GridCell {
            name: name.to_string(),
            row: index / columns,
            col: index % columns,
            active: is_active(name),
        })
        .collect()
}

/// Rows needed to hold `count` buttons.
pub fn grid_rows(count: usize, columns: usize) -> usize {
    count.div_ceil(columns.max(1))
}
