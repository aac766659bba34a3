//! Fixed colour tables for vertices.

/// A named colour with its RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Color {
    const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Color { name, rgb: (r, g, b) }
    }
}

/// Fill colour of every row vertex.
pub const ROW_COLOR: Color = Color::new("red", 255, 0, 0);

/// Outline and text colour.
pub const INK: Color = Color::new("black", 0, 0, 0);

/// Cluster palette for column vertices. Entry 0 doubles as the colour of
/// columns when no mapping is given.
pub const PALETTE: [Color; 12] = [
    Color::new("white", 255, 255, 255),
    Color::new("green", 0, 128, 0),
    Color::new("blue", 0, 0, 255),
    Color::new("yellow", 255, 255, 0),
    Color::new("purple", 128, 0, 128),
    Color::new("brown", 165, 42, 42),
    Color::new("orange", 255, 165, 0),
    Color::new("teal", 0, 128, 128),
    Color::new("magenta", 255, 0, 255),
    Color::new("cyan", 0, 255, 255),
    Color::new("grey", 128, 128, 128),
    Color::new("pink", 255, 192, 203),
];

/// Colour for a cluster id. Ids wrap around the palette; negative ids wrap too.
pub fn cluster_color(cluster_id: i64) -> Color {
    PALETTE[cluster_id.rem_euclid(PALETTE.len() as i64) as usize]
}

/// Colour of a column vertex that has no cluster.
pub fn default_column_color() -> Color {
    PALETTE[0]
}
