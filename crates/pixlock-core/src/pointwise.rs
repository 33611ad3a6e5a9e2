//! Pointwise RGBA filters run without the vision library.
//!
//! 8-bit channel math, clamped to [0, 255], alpha passed through unchanged.

/// Add `delta` to each color channel.
pub fn adjust_brightness(px: [u8; 4], delta: i32) -> [u8; 4] {
    let [r, g, b, a] = px;
    [
        clamp_u8(r as i32 + delta),
        clamp_u8(g as i32 + delta),
        clamp_u8(b as i32 + delta),
        a,
    ]
}

/// Scale each color channel around the 128 midpoint.
///
/// `factor = 1.0` is identity; larger values increase contrast.
pub fn adjust_contrast(px: [u8; 4], factor: f32) -> [u8; 4] {
    let scale = |c: u8| clamp_u8(((c as f32 - 128.0) * factor + 128.0) as i32);
    [scale(px[0]), scale(px[1]), scale(px[2]), px[3]]
}

/// Flip each color channel.
pub fn invert(px: [u8; 4]) -> [u8; 4] {
    [255 - px[0], 255 - px[1], 255 - px[2], px[3]]
}

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_clamps_high() {
        assert_eq!(adjust_brightness([250, 10, 128, 7], 50), [255, 60, 178, 7]);
    }

    #[test]
    fn test_brightness_clamps_low() {
        assert_eq!(adjust_brightness([3, 200, 0, 255], -50), [0, 150, 0, 255]);
    }

    #[test]
    fn test_contrast_one_is_identity() {
        let px = [50, 128, 200, 31];
        assert_eq!(adjust_contrast(px, 1.0), px);
    }

    #[test]
    fn test_contrast_pushes_away_from_midpoint() {
        assert_eq!(adjust_contrast([50, 128, 200, 255], 1.5), [11, 128, 236, 255]);
    }

    #[test]
    fn test_invert_is_an_involution() {
        let px = [12, 99, 255, 40];
        assert_eq!(invert(invert(px)), px);
    }

    #[test]
    fn test_invert_preserves_alpha() {
        assert_eq!(invert([0, 128, 255, 77])[3], 77);
    }
}
