use crate::ec::Blocks;
use crate::iter::EncRegionIter;
use crate::mask::{self, MaskPattern};
use crate::metadata::{
    Version, FORMAT_INFOS_QR_L, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_QR_MAIN,
    FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL,
    VERSION_INFO_COORDS_TR,
};

// QR image over the caller's bit-packed buffer
//------------------------------------------------------------------------------

/// Module grid drawn directly into the caller's output buffer, one bit per
/// module, row-major, rows byte-aligned with the leftmost module in the high
/// bit. Negative coordinates wrap from the far edge.
pub(crate) struct QrImage<'a> {
    buf: &'a mut [u8],
    w: usize,
    stride: usize,
    version: Version,
}

impl<'a> QrImage<'a> {
    pub fn new(version: Version, buf: &'a mut [u8]) -> Self {
        let w = version.width();
        let stride = version.stride();
        debug_assert!(
            buf.len() >= w * stride,
            "Output buffer too small: Buffer {}, Image {}",
            buf.len(),
            w * stride
        );

        buf[..w * stride].fill(0);
        Self { buf, w, stride, version }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    fn coord_to_index(&self, r: i16, c: i16) -> (usize, u8) {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "Column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        let index = r as usize * self.stride + (c as usize >> 3);
        (index, 0b1000_0000 >> (c & 7))
    }

    pub fn get(&self, r: i16, c: i16) -> bool {
        let (index, bit) = self.coord_to_index(r, c);
        self.buf[index] & bit != 0
    }

    pub fn set(&mut self, r: i16, c: i16, dark: bool) {
        let (index, bit) = self.coord_to_index(r, c);
        if dark {
            self.buf[index] |= bit;
        } else {
            self.buf[index] &= !bit;
        }
    }

    fn flip(&mut self, r: i16, c: i16) {
        let (index, bit) = self.coord_to_index(r, c);
        self.buf[index] ^= bit;
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                res.push(if self.get(i, j) { '#' } else { '.' });
            }
            res.push('\n');
        }
        res
    }
}

// Finder patterns
//------------------------------------------------------------------------------

impl QrImage<'_> {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => false,
                        (3 | -3, _) | (_, 3 | -3) => true,
                        (2 | -2, _) | (_, 2 | -2) => false,
                        _ => true,
                    },
                );
            }
        }
    }
}

// Timing patterns
//------------------------------------------------------------------------------

impl QrImage<'_> {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, j & 1 == 0);
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, i & 1 == 0);
            }
        }
    }
}

// Alignment patterns
//------------------------------------------------------------------------------

impl QrImage<'_> {
    fn draw_alignment_patterns(&mut self) {
        let positions = self.version.alignment_pattern();
        for &r in positions {
            for &c in positions {
                self.draw_alignment_pattern_at(r, c);
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    matches!((i, j), (-2 | 2, _) | (_, -2 | 2) | (0, 0)),
                );
            }
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QrImage<'_> {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QrImage<'_> {
    fn draw_format_info(&mut self, format_info: u16) {
        self.draw_number(u32::from(format_info), FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(u32::from(format_info), FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_QR_SIDE);
        // Dark module.
        self.set(-8, 8, true);
    }

    pub fn draw_version_info(&mut self) {
        if self.version.number() >= 7 {
            let ver_info = self.version.info();
            self.draw_number(ver_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_BL);
            self.draw_number(ver_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_TR);
        }
    }

    fn draw_number(&mut self, number: u32, bit_len: usize, coords: &[(i16, i16)]) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, number & mask != 0);
            mask >>= 1;
        }
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QrImage<'_> {
    /// Places the interleaved codeword stream into the non-function modules in
    /// zig-zag order, one bit per module, most significant bit first. Leftover
    /// remainder modules stay light.
    pub fn draw_encoding_region(&mut self, blocks: &Blocks) {
        let ver = self.version;
        let mut coords =
            EncRegionIter::new(ver).filter(|&(r, c)| !ver.is_function_module(r, c));
        for byte in blocks.interleaved() {
            for shift in (0..8).rev() {
                let dark = byte >> shift & 1 == 1;
                let coord = coords.next();
                debug_assert!(coord.is_some(), "Ran out of data modules");
                if let Some((r, c)) = coord {
                    self.set(r, c, dark);
                }
            }
        }
        debug_assert!(
            coords.count() == ver.remainder_bits(),
            "Leftover modules don't match the remainder bits"
        );
    }

    /// Flips every non-function module matching the mask predicate, then
    /// stamps the format information for the pattern.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        debug_assert!(*pattern == 0, "Only the checkerboard pattern is drawn");

        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if !self.version.is_function_module(r, c) && mask::checkerboard(r, c) {
                    self.flip(r, c);
                }
            }
        }
        self.draw_format_info(FORMAT_INFOS_QR_L[usize::from(*pattern)]);
    }
}



#[cfg(test)]
mod timing_pattern_tests {
    use super::QrImage;
    use crate::metadata::Version;

    #[test]
    fn test_timing_pattern_v1() {
        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(Version::new(1).unwrap(), &mut buf);
        qr.draw_timing_pattern();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........#.#.#........\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }
}


#[cfg(test)]
mod all_function_patterns_tests {
    use super::QrImage;
    use crate::metadata::Version;

    #[test]
    fn test_all_function_patterns_v1() {
        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(Version::new(1).unwrap(), &mut buf);
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             #######.......#######\n\
             #.....#.......#.....#\n\
             #.###.#.......#.###.#\n\
             #.###.#.......#.###.#\n\
             #.###.#.......#.###.#\n\
             #.....#.......#.....#\n\
             #######.#.#.#.#######\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             #######..............\n\
             #.....#..............\n\
             #.###.#..............\n\
             #.###.#..............\n\
             #.###.#..............\n\
             #.....#..............\n\
             #######..............\n"
        );
    }
}

#[cfg(test)]
mod qr_information_tests {
    use super::QrImage;
    use crate::mask::MaskPattern;
    use crate::metadata::{Version, FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE};

    #[test]
    fn test_no_version_info_below_v7() {
        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(Version::new(6).unwrap(), &mut buf);
        qr.draw_version_info();
        assert_eq!(qr.to_debug_str().matches('#').count(), 0);
    }

    // V7 version info is 0x7c94; check the two redundant 6x3 blocks
    // bit-by-bit against the placement formula.
    #[test]
    fn test_version_info_v7() {
        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(Version::new(7).unwrap(), &mut buf);
        qr.draw_version_info();
        let w = qr.width() as i16;
        let info = 0x7c94u32;
        for i in 0..18i16 {
            let (r, c) = (i / 3, w - 11 + i % 3);
            assert_eq!(qr.get(r, c), info >> i & 1 == 1, "Top-right bit {i}");
            assert_eq!(qr.get(c, r), info >> i & 1 == 1, "Bottom-left bit {i}");
        }
    }

    // Low ECC, checkerboard mask: format info 0x77c4 in both copies, plus the
    // dark module.
    #[test]
    fn test_format_info_checkerboard() {
        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(Version::new(1).unwrap(), &mut buf);
        qr.apply_mask(MaskPattern::CHECKERBOARD);
        let info = 0x77c4u16;
        for (i, &(r, c)) in FORMAT_INFO_COORDS_QR_MAIN.iter().enumerate() {
            let bit = 14 - i;
            assert_eq!(qr.get(r, c), info >> bit & 1 == 1, "Main copy bit {bit}");
        }
        for (i, &(r, c)) in FORMAT_INFO_COORDS_QR_SIDE.iter().enumerate() {
            let bit = 14 - i;
            assert_eq!(qr.get(r, c), info >> bit & 1 == 1, "Side copy bit {bit}");
        }
        assert!(qr.get(-8, 8), "Dark module missing");
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::QrImage;
    use crate::codec::{encode_to_codewords, Mode, Segment};
    use crate::ec::Blocks;
    use crate::metadata::Version;

    // First codeword lands in the bottom-right corner, MSB first, snaking up
    // the rightmost column pair.
    #[test]
    fn test_placement_order() {
        let ver = Version::new(1).unwrap();
        let mut msg = [0u8; 26];
        msg[0] = 0b1011_0010;
        let blocks = Blocks::new(ver, &msg);
        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(ver, &mut buf);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&blocks);
        let w = qr.width() as i16;
        assert!(qr.get(w - 1, w - 1));
        assert!(!qr.get(w - 1, w - 2));
        assert!(qr.get(w - 2, w - 1));
        assert!(qr.get(w - 2, w - 2));
        assert!(!qr.get(w - 3, w - 1));
        assert!(!qr.get(w - 3, w - 2));
        assert!(qr.get(w - 4, w - 1));
        assert!(!qr.get(w - 4, w - 2));
    }

    #[test]
    fn test_function_modules_untouched_by_mask() {
        let segs = [Segment::new(Mode::Byte, b"panic")];
        let ver = Version::new(1).unwrap();
        let mut scratch = [0u8; 3706];
        let blocks = encode_to_codewords(&segs, ver, &mut scratch);

        let mut buf = [0u8; 4071];
        let mut qr = QrImage::new(ver, &mut buf);
        qr.draw_all_function_patterns();
        let before = qr.to_debug_str();
        qr.draw_encoding_region(&blocks);
        qr.apply_mask(crate::mask::MaskPattern::CHECKERBOARD);
        let after = qr.to_debug_str();

        // Structural patterns must survive data placement and masking.
        let w = qr.width() as i16;
        for (r, c) in [(0, 0), (6, 8), (6, 10), (3, 3), (w - 1, 0), (0, w - 1), (6, 6)] {
            let idx = (r as usize) * (qr.width() + 1) + c as usize + 1;
            assert_eq!(before.as_bytes()[idx], after.as_bytes()[idx], "Module ({r}, {c}) changed");
        }
    }
}
