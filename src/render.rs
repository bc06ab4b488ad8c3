//! Expansion of the packed module grid into viewable forms. Only meant for
//! tooling and tests; the encoder itself never touches this module.

use image::{GrayImage, Luma};

/// Modules of quiet zone around the symbol.
const QUIET_ZONE: usize = 4;

fn module_at(grid: &[u8], width: usize, r: usize, c: usize) -> bool {
    let stride = width.div_ceil(8);
    grid[r * stride + (c >> 3)] & (0b1000_0000 >> (c & 7)) != 0
}

/// Expands the bit-packed grid produced by [`crate::encode`] into a grayscale
/// image, `module_sz` pixels per module, with the standard quiet zone.
pub fn to_image(grid: &[u8], width: usize, module_sz: u32) -> GrayImage {
    debug_assert!(grid.len() >= width * width.div_ceil(8), "Grid buffer shorter than width implies");

    let qz_sz = QUIET_ZONE as u32 * module_sz;
    let qr_sz = width as u32 * module_sz;
    let total_sz = qz_sz + qr_sz + qz_sz;

    let mut canvas = GrayImage::new(total_sz, total_sz);
    for i in 0..total_sz {
        for j in 0..total_sz {
            if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                canvas.put_pixel(j, i, Luma([255]));
                continue;
            }
            let r = ((i - qz_sz) / module_sz) as usize;
            let c = ((j - qz_sz) / module_sz) as usize;
            let pixel = if module_at(grid, width, r, c) { Luma([0]) } else { Luma([255]) };
            canvas.put_pixel(j, i, pixel);
        }
    }

    canvas
}

/// Text rendering with one block character per dark module, quiet zone
/// included, suitable for dumping to a console.
pub fn to_str(grid: &[u8], width: usize) -> String {
    let total_sz = QUIET_ZONE + width + QUIET_ZONE;
    let mut canvas = String::new();
    for i in 0..total_sz {
        for j in 0..total_sz {
            let inside = (QUIET_ZONE..QUIET_ZONE + width).contains(&i)
                && (QUIET_ZONE..QUIET_ZONE + width).contains(&j);
            if inside && module_at(grid, width, i - QUIET_ZONE, j - QUIET_ZONE) {
                canvas.push('█');
            } else {
                canvas.push(' ');
            }
        }
        canvas.push('\n');
    }
    canvas
}
