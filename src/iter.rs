use crate::metadata::Version;

// Iterator for placing data in the encoding region
//------------------------------------------------------------------------------

/// Yields every module coordinate in codeword placement order: two-module
/// column pairs walked right to left, alternating upward and downward, with
/// the vertical timing column skipped entirely. Callers filter out function
/// modules.
pub(crate) struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

/// Column of the vertical timing pattern, never part of a column pair.
const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}
