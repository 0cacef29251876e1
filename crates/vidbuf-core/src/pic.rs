//! Row-wise copy and fill over strided planes.
//!
//! Planes are addressed as (byte offset of row 0, signed stride) inside a
//! backing slice. A negative stride walks the rows bottom-up.

#[inline]
fn row_start(offset: usize, stride: isize, y: usize) -> usize {
    let pos = offset as isize + y as isize * stride;
    assert!(pos >= 0, "plane row {} starts before its buffer", y);
    pos as usize
}

/// Copy `height` rows of `bytes_per_line` bytes between two strided planes.
#[allow(clippy::too_many_arguments)]
pub fn copy_pic(
    dst: &mut [u8],
    dst_offset: usize,
    dst_stride: isize,
    src: &[u8],
    src_offset: usize,
    src_stride: isize,
    bytes_per_line: usize,
    height: usize,
) {
    if height == 0 || bytes_per_line == 0 {
        return;
    }
    if bytes_per_line as isize == dst_stride.abs() && dst_stride == src_stride {
        // Rows are contiguous: one copy covers the whole plane.
        let (d, s) = if src_stride < 0 {
            (
                row_start(dst_offset, dst_stride, height - 1),
                row_start(src_offset, src_stride, height - 1),
            )
        } else {
            (dst_offset, src_offset)
        };
        let len = bytes_per_line * height;
        dst[d..d + len].copy_from_slice(&src[s..s + len]);
        return;
    }
    for y in 0..height {
        let d = row_start(dst_offset, dst_stride, y);
        let s = row_start(src_offset, src_stride, y);
        dst[d..d + bytes_per_line].copy_from_slice(&src[s..s + bytes_per_line]);
    }
}

/// Fill `height` rows of `bytes_per_line` bytes with `value`.
pub fn fill_pic(
    dst: &mut [u8],
    offset: usize,
    stride: isize,
    value: u8,
    bytes_per_line: usize,
    height: usize,
) {
    for y in 0..height {
        let d = row_start(offset, stride, y);
        dst[d..d + bytes_per_line].fill(value);
    }
}

/// Fill `height` rows of `units_per_line` two-byte units with `pattern`.
pub fn fill16_pic(
    dst: &mut [u8],
    offset: usize,
    stride: isize,
    pattern: [u8; 2],
    units_per_line: usize,
    height: usize,
) {
    if pattern == [0, 0] {
        fill_pic(dst, offset, stride, 0, units_per_line * 2, height);
        return;
    }
    for y in 0..height {
        let d = row_start(offset, stride, y);
        for unit in dst[d..d + units_per_line * 2].chunks_exact_mut(2) {
            unit.copy_from_slice(&pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_padded_rows() {
        let src: Vec<u8> = (0..16).collect();
        let mut dst = vec![0u8; 12];
        // 3 bytes of each 4-byte source row into 3-byte destination rows.
        copy_pic(&mut dst, 0, 3, &src, 0, 4, 3, 4);
        assert_eq!(dst, [0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14]);
    }

    #[test]
    fn test_copy_contiguous() {
        let src: Vec<u8> = (0..12).collect();
        let mut dst = vec![0u8; 12];
        copy_pic(&mut dst, 0, 4, &src, 0, 4, 4, 3);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_copy_negative_stride_contiguous() {
        let src: Vec<u8> = (0..12).collect();
        let mut dst = vec![0u8; 12];
        // Row 0 is the last row in memory for both planes.
        copy_pic(&mut dst, 8, -4, &src, 8, -4, 4, 3);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_copy_flips_when_strides_differ_in_sign() {
        let src: Vec<u8> = vec![1, 1, 2, 2, 3, 3];
        let mut dst = vec![0u8; 6];
        copy_pic(&mut dst, 4, -2, &src, 0, 2, 2, 3);
        assert_eq!(dst, [3, 3, 2, 2, 1, 1]);
    }

    #[test]
    fn test_fill_leaves_padding() {
        let mut buf = vec![9u8; 8];
        fill_pic(&mut buf, 0, 4, 0x80, 2, 2);
        assert_eq!(buf, [0x80, 0x80, 9, 9, 0x80, 0x80, 9, 9]);
    }

    #[test]
    fn test_fill16_pattern() {
        let mut buf = vec![0u8; 8];
        fill16_pic(&mut buf, 0, 8, [0x80, 0x00], 4, 1);
        assert_eq!(buf, [0x80, 0, 0x80, 0, 0x80, 0, 0x80, 0]);
    }

    #[test]
    #[should_panic(expected = "starts before its buffer")]
    fn test_negative_offset_panics() {
        let mut buf = vec![0u8; 8];
        fill_pic(&mut buf, 0, -4, 0, 4, 2);
    }
}
