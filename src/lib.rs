//! # panicqr
//!
//! Allocation-free QR code encoder for panic and fault reporting paths.
//!
//! The encoder is meant to run where the heap may be corrupted or absent, e.g.
//! inside a fault handler that wants to put a crash report on screen. All
//! state lives in two caller-supplied buffers and on the stack, the encode
//! path performs no I/O and never panics, and every iteration count is bounded
//! by the largest symbol version. Error correction is fixed at the low level
//! and only the checkerboard mask is applied, which keeps the tables small and
//! the run time deterministic.
//!
//! Payloads are either a single binary segment, or a binary prefix (typically
//! a report URL) followed by a numeric segment of ASCII digits packed at
//! higher density.
//!
//! ## Quick start
//!
//! ```rust
//! use panicqr::{encode, OUT_BUFFER_LEN, SCRATCH_BUFFER_LEN};
//!
//! # fn main() -> Result<(), panicqr::QRError> {
//! let mut out = [0u8; OUT_BUFFER_LEN];
//! let mut scratch = [0u8; SCRATCH_BUFFER_LEN];
//!
//! // Binary prefix stays readable, the diagnostic payload packs as digits.
//! let width = encode(
//!     Some("https://bugs.example.com/r/"),
//!     b"1234567890",
//!     &mut out,
//!     &mut scratch,
//! )?;
//! assert_eq!(width, 29); // Version 3
//! # Ok(())
//! # }
//! ```
//!
//! The output buffer holds the module grid packed one bit per module,
//! row-major, each row byte-aligned (`⌈width / 8⌉` bytes per row) with the
//! leftmost module in the high bit. With the default `render` feature,
//! [`render::to_image`] expands it for a reference decoder or a debug dump.

#![allow(dead_code)]

mod bitstream;
mod codec;
mod ec;
mod error;
mod galois;
mod iter;
mod mask;
mod metadata;
mod qr;

#[cfg(feature = "render")]
pub mod render;

pub use error::{QRError, QRResult};
pub use mask::MaskPattern;
pub use metadata::Version;

use codec::{Mode, Segment};
use qr::QrImage;

/// Minimum output buffer length accepted by [`encode`]: a version 40 symbol,
/// one bit per module with byte-aligned rows.
pub const OUT_BUFFER_LEN: usize = 4071;

/// Minimum scratch buffer length accepted by [`encode`]: every data and error
/// correction codeword of a version 40 symbol.
pub const SCRATCH_BUFFER_LEN: usize = 3706;

/// Encodes `payload` into the smallest QR symbol that fits and draws it into
/// `out`, returning the symbol width in modules.
///
/// With a `prefix`, two segments are emitted: the prefix in binary mode and
/// `payload` — which must then consist of ASCII digits — in numeric mode.
/// Without one, `payload` is a single binary segment. `scratch` is working
/// memory for codeword assembly; both buffers must meet the version-40
/// minimums regardless of the version actually selected, so callers size them
/// once with [`OUT_BUFFER_LEN`] and [`SCRATCH_BUFFER_LEN`].
///
/// On any error nothing useful is in `out`; callers must check the result
/// rather than the buffer.
pub fn encode(
    prefix: Option<&str>,
    payload: &[u8],
    out: &mut [u8],
    scratch: &mut [u8],
) -> QRResult<usize> {
    if out.len() < OUT_BUFFER_LEN || scratch.len() < SCRATCH_BUFFER_LEN {
        return Err(QRError::BufferTooSmall);
    }

    let prefixed;
    let plain;
    let segments: &[Segment] = match prefix {
        Some(url) => {
            prefixed =
                [Segment::new(Mode::Byte, url.as_bytes()), Segment::new(Mode::Numeric, payload)];
            &prefixed
        }
        None => {
            plain = [Segment::new(Mode::Byte, payload)];
            &plain
        }
    };
    for seg in segments {
        seg.validate()?;
    }

    let ver = codec::find_version(segments)?;
    let blocks = codec::encode_to_codewords(segments, ver, scratch);

    let mut image = QrImage::new(ver, out);
    image.draw_all_function_patterns();
    image.draw_version_info();
    image.draw_encoding_region(&blocks);
    image.apply_mask(MaskPattern::CHECKERBOARD);
    Ok(image.width())
}

/// Largest payload guaranteed to fit `version`: bytes for a binary-only
/// payload when `prefix_len` is 0, decimal digits behind a `prefix_len`-byte
/// binary prefix otherwise. Returns 0 when the prefix alone exceeds the
/// version's capacity.
pub fn max_payload_len(version: Version, prefix_len: usize) -> usize {
    let bit_capacity = version.data_capacity() * 8;
    if prefix_len > 0 {
        let overhead = 2 * 4
            + version.char_cnt_bits(Mode::Byte)
            + version.char_cnt_bits(Mode::Numeric)
            + prefix_len * 8;
        if overhead > bit_capacity {
            return 0;
        }
        // Greatest digit count whose 10-bits-per-3-digits cost still fits.
        (bit_capacity - overhead) * 3 / 10
    } else {
        let overhead = 4 + version.char_cnt_bits(Mode::Byte);
        (bit_capacity - overhead) / 8
    }
}
