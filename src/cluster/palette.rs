/// Display colors for clusters, in slot order
pub const PALETTE: [&str; 7] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6",
];

/// Returns the display color of cluster slot `index`, cycling through [`PALETTE`]
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
