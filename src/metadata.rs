use crate::codec::Mode;
use crate::ec;
use crate::error::{QRError, QRResult};

// Version
//------------------------------------------------------------------------------

/// QR symbol version, 1..=40. Width in modules is `4 * version + 17`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(version: u8) -> QRResult<Self> {
        if (1..=40).contains(&version) {
            Ok(Self(version))
        } else {
            Err(QRError::InvalidVersion)
        }
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    /// Bytes per bit-packed output row.
    pub const fn stride(self) -> usize {
        self.width().div_ceil(8)
    }

    fn parameter(self) -> &'static VersionParameter {
        &VERSION_PARAMETERS[self.0 as usize - 1]
    }

    pub(crate) fn poly(self) -> &'static [u8] {
        self.parameter().poly
    }

    pub(crate) fn ec_size(self) -> usize {
        self.parameter().poly.len()
    }

    pub(crate) fn g1_blocks(self) -> usize {
        self.parameter().g1_blocks
    }

    pub(crate) fn g2_blocks(self) -> usize {
        self.parameter().g2_blocks
    }

    pub(crate) fn g1_blk_size(self) -> usize {
        self.parameter().g1_blk_size
    }

    pub(crate) fn block_count(self) -> usize {
        let vp = self.parameter();
        vp.g1_blocks + vp.g2_blocks
    }

    /// Byte offset and size of data block `b` within the data codeword region.
    /// Group 1 blocks come first; group 2 blocks are one byte larger.
    pub(crate) fn data_block_span(self, b: usize) -> (usize, usize) {
        debug_assert!(b < self.block_count(), "Block index out of range: {b}");

        let (g1, s) = (self.g1_blocks(), self.g1_blk_size());
        if b < g1 {
            (b * s, s)
        } else {
            (g1 * s + (b - g1) * (s + 1), s + 1)
        }
    }

    /// Data codewords at low error correction.
    pub fn data_capacity(self) -> usize {
        let vp = self.parameter();
        vp.g1_blocks * vp.g1_blk_size + vp.g2_blocks * (vp.g1_blk_size + 1)
    }

    pub(crate) fn data_bit_capacity(self) -> usize {
        self.data_capacity() * 8
    }

    /// Data plus error correction codewords.
    pub fn total_codewords(self) -> usize {
        self.data_capacity() + self.ec_size() * self.block_count()
    }

    pub(crate) fn mode_bits(self) -> usize {
        4
    }

    /// Width of the character count field for `mode` at this version's tier.
    pub(crate) fn char_cnt_bits(self, mode: Mode) -> usize {
        match (mode, self.0) {
            (Mode::Numeric, 1..=9) => 10,
            (Mode::Numeric, 10..=26) => 12,
            (Mode::Numeric, _) => 14,
            (Mode::Byte, 1..=9) => 8,
            (Mode::Byte, _) => 16,
        }
    }

    /// Leftover modules in the encoding region that carry no codeword bits.
    pub(crate) fn remainder_bits(self) -> usize {
        match self.0 {
            2..=6 => 7,
            14..=20 | 28..=34 => 3,
            21..=27 => 4,
            _ => 0,
        }
    }

    /// Alignment pattern center coordinates, one axis; centers lie on the
    /// cartesian product of this list.
    pub(crate) fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 as usize - 1]
    }

    /// 18-bit version information, present from version 7 up.
    pub(crate) fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version information starts at version 7");

        VERSION_INFORMATION[self.0 as usize - 7]
    }

    /// True for modules that belong to a fixed structural pattern or to the
    /// format/version information areas, so never carry codeword bits.
    pub(crate) fn is_function_module(self, r: i16, c: i16) -> bool {
        let w = self.width() as i16;
        debug_assert!(0 <= r && r < w, "Row out of bounds: {r}");
        debug_assert!(0 <= c && c < w, "Column out of bounds: {c}");

        // Finder corners, including separators, format info and the dark module.
        if (r <= 8 && c <= 8) || (r <= 8 && c >= w - 8) || (r >= w - 8 && c <= 8) {
            return true;
        }
        // Timing patterns.
        if r == 6 || c == 6 {
            return true;
        }
        // Version information blocks.
        if self.0 >= 7 && ((r < 6 && w - 11 <= c && c < w - 8) || (c < 6 && w - 11 <= r && r < w - 8))
        {
            return true;
        }
        // Alignment patterns; the three centers touching finders are not drawn.
        let positions = self.alignment_pattern();
        for &ar in positions {
            for &ac in positions {
                if (ar == 6 && (ac == 6 || ac == w - 7)) || (ar == w - 7 && ac == 6) {
                    continue;
                }
                if (r - ar).abs() <= 2 && (c - ac).abs() <= 2 {
                    return true;
                }
            }
        }
        false
    }
}

// Version parameters
//------------------------------------------------------------------------------

/// Block structure for one version at low error correction. Group 2 blocks are
/// always one byte larger than group 1 blocks.
struct VersionParameter {
    poly: &'static [u8],
    g1_blocks: usize,
    g2_blocks: usize,
    g1_blk_size: usize,
}

const fn vp(
    poly: &'static [u8],
    g1_blocks: usize,
    g2_blocks: usize,
    g1_blk_size: usize,
) -> VersionParameter {
    VersionParameter { poly, g1_blocks, g2_blocks, g1_blk_size }
}

static VERSION_PARAMETERS: [VersionParameter; 40] = [
    vp(&ec::P7, 1, 0, 19),    // V1
    vp(&ec::P10, 1, 0, 34),   // V2
    vp(&ec::P15, 1, 0, 55),   // V3
    vp(&ec::P20, 1, 0, 80),   // V4
    vp(&ec::P26, 1, 0, 108),  // V5
    vp(&ec::P18, 2, 0, 68),   // V6
    vp(&ec::P20, 2, 0, 78),   // V7
    vp(&ec::P24, 2, 0, 97),   // V8
    vp(&ec::P30, 2, 0, 116),  // V9
    vp(&ec::P18, 2, 2, 68),   // V10
    vp(&ec::P20, 4, 0, 81),   // V11
    vp(&ec::P24, 2, 2, 92),   // V12
    vp(&ec::P26, 4, 0, 107),  // V13
    vp(&ec::P30, 3, 1, 115),  // V14
    vp(&ec::P22, 5, 1, 87),   // V15
    vp(&ec::P24, 5, 1, 98),   // V16
    vp(&ec::P28, 1, 5, 107),  // V17
    vp(&ec::P30, 5, 1, 120),  // V18
    vp(&ec::P28, 3, 4, 113),  // V19
    vp(&ec::P28, 3, 5, 107),  // V20
    vp(&ec::P28, 4, 4, 116),  // V21
    vp(&ec::P28, 2, 7, 111),  // V22
    vp(&ec::P30, 4, 5, 121),  // V23
    vp(&ec::P30, 6, 4, 117),  // V24
    vp(&ec::P26, 8, 4, 106),  // V25
    vp(&ec::P28, 10, 2, 114), // V26
    vp(&ec::P30, 8, 4, 122),  // V27
    vp(&ec::P30, 3, 10, 117), // V28
    vp(&ec::P30, 7, 7, 116),  // V29
    vp(&ec::P30, 5, 10, 115), // V30
    vp(&ec::P30, 13, 3, 115), // V31
    vp(&ec::P30, 17, 0, 115), // V32
    vp(&ec::P30, 17, 1, 115), // V33
    vp(&ec::P30, 13, 6, 115), // V34
    vp(&ec::P30, 12, 7, 121), // V35
    vp(&ec::P30, 6, 14, 121), // V36
    vp(&ec::P30, 17, 4, 122), // V37
    vp(&ec::P30, 4, 18, 122), // V38
    vp(&ec::P30, 20, 4, 117), // V39
    vp(&ec::P30, 19, 6, 118), // V40
];

// Alignment patterns
//------------------------------------------------------------------------------

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],                               // V1
    &[6, 18],                          // V2
    &[6, 22],                          // V3
    &[6, 26],                          // V4
    &[6, 30],                          // V5
    &[6, 34],                          // V6
    &[6, 22, 38],                      // V7
    &[6, 24, 42],                      // V8
    &[6, 26, 46],                      // V9
    &[6, 28, 50],                      // V10
    &[6, 30, 54],                      // V11
    &[6, 32, 58],                      // V12
    &[6, 34, 62],                      // V13
    &[6, 26, 46, 66],                  // V14
    &[6, 26, 48, 70],                  // V15
    &[6, 26, 50, 74],                  // V16
    &[6, 30, 54, 78],                  // V17
    &[6, 30, 56, 82],                  // V18
    &[6, 30, 58, 86],                  // V19
    &[6, 34, 62, 90],                  // V20
    &[6, 28, 50, 72, 94],              // V21
    &[6, 26, 50, 74, 98],              // V22
    &[6, 30, 54, 78, 102],             // V23
    &[6, 28, 54, 80, 106],             // V24
    &[6, 32, 58, 84, 110],             // V25
    &[6, 30, 58, 86, 114],             // V26
    &[6, 34, 62, 90, 118],             // V27
    &[6, 26, 50, 74, 98, 122],         // V28
    &[6, 30, 54, 78, 102, 126],        // V29
    &[6, 26, 52, 78, 104, 130],        // V30
    &[6, 30, 56, 82, 108, 134],        // V31
    &[6, 34, 60, 86, 112, 138],        // V32
    &[6, 30, 58, 86, 114, 142],        // V33
    &[6, 34, 62, 90, 118, 146],        // V34
    &[6, 30, 54, 78, 102, 126, 150],   // V35
    &[6, 24, 50, 76, 102, 128, 154],   // V36
    &[6, 28, 54, 80, 106, 132, 158],   // V37
    &[6, 32, 58, 84, 110, 136, 162],   // V38
    &[6, 26, 54, 82, 110, 138, 166],   // V39
    &[6, 30, 58, 86, 114, 142, 170],   // V40
];

// Format & version information
//------------------------------------------------------------------------------

pub(crate) const FORMAT_INFO_BIT_LEN: usize = 15;

pub(crate) const VERSION_INFO_BIT_LEN: usize = 18;

/// Masked 15-bit format strings for low error correction, indexed by mask
/// pattern.
pub(crate) static FORMAT_INFOS_QR_L: [u16; 8] = [
    0x77c4, 0x72f3, 0x7daa, 0x789d, 0x662f, 0x6318, 0x6c41, 0x6976,
];

/// 18-bit version information strings for versions 7..=40.
static VERSION_INFORMATION: [u32; 34] = [
    0x00007c94, 0x000085bc, 0x00009a99, 0x0000a4d3, 0x0000bbf6, 0x0000c762, 0x0000d847, 0x0000e60d,
    0x0000f928, 0x00010b78, 0x0001145d, 0x00012a17, 0x00013532, 0x000149a6, 0x00015683, 0x000168c9,
    0x000177ec, 0x00018ec4, 0x000191e1, 0x0001afab, 0x0001b08e, 0x0001cc1a, 0x0001d33f, 0x0001ed75,
    0x0001f250, 0x000209d5, 0x000216f0, 0x0002281a, 0x0002373f, 0x00024b0b, 0x000254ce, 0x000269c4,
    0x000276e1, 0x00028c0b,
];

/// Format information module coordinates around the top-left finder, most
/// significant bit first. Negative coordinates wrap from the far edge.
pub(crate) static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

/// Redundant format information copy, split between the bottom-left column and
/// the top-right row, most significant bit first.
pub(crate) static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

/// Version information block beside the bottom-left finder, most significant
/// bit first.
pub(crate) static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

/// Version information block above the top-right finder, most significant bit
/// first.
pub(crate) static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::Version;

    #[test]
    fn test_width() {
        for v in 1..=40u8 {
            let ver = Version::new(v).unwrap();
            assert_eq!(ver.width(), v as usize * 4 + 17);
            assert_eq!(ver.width() & 1, 1, "Width should be odd for version {v}");
        }
        assert_eq!(Version::MIN.width(), 21);
        assert_eq!(Version::MAX.width(), 177);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
        assert!(Version::new(1).is_ok());
        assert!(Version::new(40).is_ok());
    }

    #[test_case(1, 19, 26)]
    #[test_case(2, 34, 44)]
    #[test_case(5, 108, 134)]
    #[test_case(10, 274, 346)]
    #[test_case(17, 647, 815)]
    #[test_case(25, 1276, 1708)]
    #[test_case(31, 1843, 2323)]
    #[test_case(40, 2956, 3706)]
    fn test_codeword_capacities(v: u8, data: usize, total: usize) {
        let ver = Version::new(v).unwrap();
        assert_eq!(ver.data_capacity(), data);
        assert_eq!(ver.total_codewords(), total);
    }

    #[test]
    fn test_alignment_pattern_bounds() {
        for v in 2..=40u8 {
            let ver = Version::new(v).unwrap();
            let positions = ver.alignment_pattern();
            assert_eq!(positions[0], 6, "First center is fixed for version {v}");
            assert_eq!(
                *positions.last().unwrap() as usize,
                ver.width() - 7,
                "Last center is finder-aligned for version {v}"
            );
            for pair in positions.windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
        assert!(Version::new(1).unwrap().alignment_pattern().is_empty());
    }

    #[test]
    fn test_version_info_values() {
        assert_eq!(Version::new(7).unwrap().info(), 0x7c94);
        assert_eq!(Version::new(21).unwrap().info(), 0x177ec);
        assert_eq!(Version::new(40).unwrap().info(), 0x28c0b);
    }

    // Every non-function module carries exactly one codeword or remainder bit,
    // so the census pins down both the block tables and the reservation
    // predicate at once.
    #[test]
    fn test_encoding_region_census() {
        for v in 1..=40u8 {
            let ver = Version::new(v).unwrap();
            let w = ver.width() as i16;
            let mut data_modules = 0;
            for r in 0..w {
                for c in 0..w {
                    if !ver.is_function_module(r, c) {
                        data_modules += 1;
                    }
                }
            }
            assert_eq!(
                data_modules,
                ver.total_codewords() * 8 + ver.remainder_bits(),
                "Census mismatch for version {v}"
            );
        }
    }
}
