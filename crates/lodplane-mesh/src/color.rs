//! Color averaging used when subdivision introduces a centroid vertex.

/// Color assigned to every edge-midpoint vertex (opaque white).
pub const MIDPOINT_COLOR: u32 = 0xFFFF_FFFF;

/// Strategy for averaging the four corner colors of a quad into its centroid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorBlend {
    /// Sum the packed words as integers (wrapping) and divide by four.
    ///
    /// Carries bleed across channel boundaries. Kept as the default so meshes
    /// stay byte-identical to the ones existing hosts were built against.
    #[default]
    PackedInteger,
    /// Average each byte channel independently.
    PerChannel,
}

impl ColorBlend {
    /// Average four packed colors with this strategy.
    pub fn average(self, colors: [u32; 4]) -> u32 {
        match self {
            ColorBlend::PackedInteger => average_packed(colors),
            ColorBlend::PerChannel => average_per_channel(colors),
        }
    }
}

/// Wrapping integer sum of the packed words divided by four.
pub fn average_packed(colors: [u32; 4]) -> u32 {
    colors.iter().fold(0u32, |acc, &c| acc.wrapping_add(c)) / 4
}

/// Byte-wise mean of the four colors, truncating.
pub fn average_per_channel(colors: [u32; 4]) -> u32 {
    let mut out = [0u8; 4];
    for (channel, slot) in out.iter_mut().enumerate() {
        let sum: u32 = colors
            .iter()
            .map(|c| u32::from(c.to_ne_bytes()[channel]))
            .sum();
        *slot = (sum / 4) as u8;
    }
    u32::from_ne_bytes(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_average_of_equal_colors() {
        assert_eq!(average_packed([0x1010_1010; 4]), 0x1010_1010);
    }

    #[test]
    fn test_packed_average_wraps_on_overflow() {
        // 4 * 0xFF.. overflows u32; the sum wraps before the divide.
        let colors = [0xFFFF_0000, 0xFF00_FF00, 0xFF00_00FF, 0xFF0F_0F0F];
        let expected = colors
            .iter()
            .fold(0u32, |acc, &c| acc.wrapping_add(c))
            / 4;
        assert_eq!(average_packed(colors), expected);
        assert_ne!(average_packed(colors), average_per_channel(colors));
    }

    #[test]
    fn test_per_channel_average() {
        let a = u32::from_ne_bytes([0, 100, 200, 255]);
        let b = u32::from_ne_bytes([4, 100, 0, 255]);
        let avg = average_per_channel([a, b, a, b]);
        assert_eq!(avg.to_ne_bytes(), [2, 100, 100, 255]);
    }

    #[test]
    fn test_blend_dispatch() {
        let colors = [0x0000_0004, 0x0000_0008, 0x0000_0000, 0x0000_0000];
        assert_eq!(ColorBlend::PackedInteger.average(colors), 3);
        assert_eq!(ColorBlend::default(), ColorBlend::PackedInteger);
    }
}
