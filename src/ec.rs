use crate::galois::{gf_mul, EXP_TABLE};
use crate::metadata::Version;

// Generator polynomials
//------------------------------------------------------------------------------

// Coefficients are stored as exponents of the field generator, highest-order
// term first, with the leading 1 implied. Only the degrees needed at low error
// correction are kept.
pub(crate) static P7: [u8; 7] = [87, 229, 146, 149, 238, 102, 21];
pub(crate) static P10: [u8; 10] = [251, 67, 46, 61, 118, 70, 64, 94, 32, 45];
pub(crate) static P15: [u8; 15] =
    [8, 183, 61, 91, 202, 37, 51, 58, 58, 237, 140, 124, 5, 99, 105];
pub(crate) static P18: [u8; 18] =
    [215, 234, 158, 94, 184, 97, 118, 170, 79, 187, 152, 148, 252, 179, 5, 98, 96, 153];
pub(crate) static P20: [u8; 20] = [
    17, 60, 79, 50, 61, 163, 26, 187, 202, 180, 221, 225, 83, 239, 156, 164, 212, 212, 188, 190,
];
pub(crate) static P22: [u8; 22] = [
    210, 171, 247, 242, 93, 230, 14, 109, 221, 53, 200, 74, 8, 172, 98, 80, 219, 134, 160, 105,
    165, 231,
];
pub(crate) static P24: [u8; 24] = [
    229, 121, 135, 48, 211, 117, 251, 126, 159, 180, 169, 152, 192, 226, 228, 218, 111, 0, 117,
    232, 87, 96, 227, 21,
];
pub(crate) static P26: [u8; 26] = [
    173, 125, 158, 2, 103, 182, 118, 17, 145, 201, 111, 28, 165, 53, 161, 21, 245, 142, 13, 102,
    48, 227, 153, 145, 218, 70,
];
pub(crate) static P28: [u8; 28] = [
    168, 223, 200, 104, 224, 234, 108, 180, 110, 190, 195, 147, 205, 27, 232, 201, 21, 43, 245, 87,
    42, 195, 212, 119, 242, 37, 9, 123,
];
pub(crate) static P30: [u8; 30] = [
    41, 173, 145, 152, 216, 31, 179, 182, 50, 48, 110, 86, 239, 96, 222, 125, 42, 173, 226, 193,
    224, 130, 156, 37, 251, 216, 238, 40, 192, 180,
];

/// Largest supported error correction block size.
pub(crate) const MAX_EC_SIZE: usize = 30;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

/// Computes the Reed-Solomon remainder of `data` for the generator polynomial
/// `poly` into `ecc_out`. The concatenation `data ‖ ecc_out` is then divisible
/// by the generator.
pub(crate) fn ecc(data: &[u8], poly: &'static [u8], ecc_out: &mut [u8]) {
    debug_assert!(poly.len() <= MAX_EC_SIZE, "Unsupported generator degree: {}", poly.len());
    debug_assert!(
        ecc_out.len() == poly.len(),
        "ECC output size doesn't match generator degree: Output {}, Degree {}",
        ecc_out.len(),
        poly.len()
    );

    let ec_size = poly.len();
    let mut rem = [0u8; MAX_EC_SIZE];
    for &byte in data {
        let factor = byte ^ rem[0];
        rem.copy_within(1..ec_size, 0);
        rem[ec_size - 1] = 0;
        if factor != 0 {
            for (r, &p) in rem[..ec_size].iter_mut().zip(poly.iter()) {
                *r ^= gf_mul(EXP_TABLE[usize::from(p)], factor);
            }
        }
    }
    ecc_out.copy_from_slice(&rem[..ec_size]);
}

// Block structure & interleaving
//------------------------------------------------------------------------------

/// Borrowed view over the assembled codewords in the scratch buffer: all data
/// codewords first, then every block's error correction codewords.
pub(crate) struct Blocks<'a> {
    msg: &'a [u8],
    version: Version,
}

impl<'a> Blocks<'a> {
    pub fn new(version: Version, msg: &'a [u8]) -> Self {
        debug_assert!(
            msg.len() == version.total_codewords(),
            "Message length doesn't match total codewords: Message {}, Total {}",
            msg.len(),
            version.total_codewords()
        );

        Self { msg, version }
    }

    fn data_block(&self, b: usize) -> &'a [u8] {
        let (offset, size) = self.version.data_block_span(b);
        &self.msg[offset..offset + size]
    }

    fn ec_block(&self, b: usize) -> &'a [u8] {
        let ec_size = self.version.ec_size();
        let offset = self.version.data_capacity() + b * ec_size;
        &self.msg[offset..offset + ec_size]
    }

    /// Final codeword stream: one byte per block round-robin over the data
    /// blocks, then the same over the error correction blocks, so a burst of
    /// damage in one symbol region spreads across blocks.
    pub fn interleaved(&self) -> impl Iterator<Item = u8> + '_ {
        let blocks = self.version.block_count();
        let max_blk_size =
            self.version.g1_blk_size() + usize::from(self.version.g2_blocks() > 0);
        let ec_size = self.version.ec_size();

        let data = (0..max_blk_size).flat_map(move |i| {
            (0..blocks).filter_map(move |b| {
                let block = self.data_block(b);
                (i < block.len()).then(|| block[i])
            })
        });
        let ec = (0..ec_size)
            .flat_map(move |i| (0..blocks).map(move |b| self.ec_block(b)[i]));
        data.chain(ec)
    }
}
