// layout.rs: staggered tile grid on the sphere
//
// Columns step by 2 grid units; even columns use one row pattern and odd
// columns the other, giving the brick-like stagger.

const COLUMN_STEP: i32 = 2;
/// Grid column of the first tile, whatever the segment count.
const FIRST_COLUMN: i32 = -37;
const EVEN_ROWS: [i32; 5] = [-4, -2, 0, 2, 4];
const ODD_ROWS: [i32; 5] = [-3, -1, 1, 3, 5];
const TILE_SIZE: i32 = 2;

/// One entry of the image pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

impl ImageRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: String::new(),
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub offset_x: i32,
    pub offset_y: i32,
    pub size_x: i32,
    pub size_y: i32,
    pub image: ImageRef,
}

/// Resting rotation of a tile on the sphere, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRotation {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl TilePlacement {
    pub fn base_rotation(&self, segments: usize) -> TileRotation {
        let unit = grid_unit_deg(segments);
        TileRotation {
            rotate_y: unit * (self.offset_x as f64 + (self.size_x - 1) as f64 / 2.0),
            rotate_x: unit * (self.offset_y as f64 - (self.size_y - 1) as f64 / 2.0),
        }
    }
}

/// Degrees spanned by one grid unit.
pub fn grid_unit_deg(segments: usize) -> f64 {
    360.0 / segments.max(1) as f64 / 2.0
}

/// Number of tiles `build_tiles` produces for `segments`.
pub fn tile_count(segments: usize) -> usize {
    segments * EVEN_ROWS.len()
}

/// Build the fixed render list. Images cycle through `pool`; an empty pool
/// yields tiles with empty image identifiers.
pub fn build_tiles(pool: &[ImageRef], segments: usize) -> Vec<TilePlacement> {
    let coords: Vec<(i32, i32)> = (0..segments)
        .flat_map(|c| {
            let x = FIRST_COLUMN + c as i32 * COLUMN_STEP;
            let rows = if c % 2 == 0 { &EVEN_ROWS } else { &ODD_ROWS };
            rows.iter().map(move |&y| (x, y))
        })
        .collect();

    let images: Vec<ImageRef> = if pool.is_empty() {
        vec![ImageRef::default(); coords.len()]
    } else {
        let mut used: Vec<ImageRef> = (0..coords.len())
            .map(|i| pool[i % pool.len()].clone())
            .collect();
        separate_adjacent_duplicates(&mut used);
        used
    };

    coords
        .into_iter()
        .zip(images)
        .map(|((x, y), image)| TilePlacement {
            offset_x: x,
            offset_y: y,
            size_x: TILE_SIZE,
            size_y: TILE_SIZE,
            image,
        })
        .collect()
}

/// Whenever tile `i` repeats the source of tile `i - 1`, swap it with the first
/// later tile whose source differs. At most one swap per conflict.
fn separate_adjacent_duplicates(images: &mut [ImageRef]) {
    for i in 1..images.len() {
        if images[i].src != images[i - 1].src {
            continue;
        }
        if let Some(j) = (i + 1..images.len()).find(|&j| images[j].src != images[i].src) {
            images.swap(i, j);
        }
    }
}
