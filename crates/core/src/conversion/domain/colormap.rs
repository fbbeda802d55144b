/// Colormaps for rendering single-channel images, numbered the way
/// image-processing toolkits conventionally number them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    Autumn,
    Bone,
    Jet,
    Winter,
    Rainbow,
    Ocean,
    Summer,
    Spring,
    Cool,
    Hsv,
    Pink,
    Hot,
    Parula,
    Magma,
    Inferno,
    Plasma,
    Viridis,
    Cividis,
    Twilight,
    TwilightShifted,
    Turbo,
    DeepGreen,
}

impl Colormap {
    /// Negative ids mean "no colormap" and are handled by the caller.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Autumn),
            1 => Some(Self::Bone),
            2 => Some(Self::Jet),
            3 => Some(Self::Winter),
            4 => Some(Self::Rainbow),
            5 => Some(Self::Ocean),
            6 => Some(Self::Summer),
            7 => Some(Self::Spring),
            8 => Some(Self::Cool),
            9 => Some(Self::Hsv),
            10 => Some(Self::Pink),
            11 => Some(Self::Hot),
            12 => Some(Self::Parula),
            13 => Some(Self::Magma),
            14 => Some(Self::Inferno),
            15 => Some(Self::Plasma),
            16 => Some(Self::Viridis),
            17 => Some(Self::Cividis),
            18 => Some(Self::Twilight),
            19 => Some(Self::TwilightShifted),
            20 => Some(Self::Turbo),
            21 => Some(Self::DeepGreen),
            _ => None,
        }
    }

    /// Maps a normalized value (clamped to 0.0-1.0) to RGB.
    pub fn apply(&self, value: f64) -> [u8; 3] {
        let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let [r, g, b] = match self {
            Self::Parula => return interpolate(&PARULA, v),
            Self::Magma => return interpolate(&MAGMA, v),
            Self::Inferno => return interpolate(&INFERNO, v),
            Self::Plasma => return interpolate(&PLASMA, v),
            Self::Viridis => return interpolate(&VIRIDIS, v),
            Self::Cividis => return interpolate(&CIVIDIS, v),
            Self::Twilight => return interpolate(&TWILIGHT, v),
            Self::TwilightShifted => return interpolate(&TWILIGHT, (v + 0.5) % 1.0),
            Self::Turbo => return interpolate(&TURBO, v),
            Self::DeepGreen => return interpolate(&DEEP_GREEN, v),
            Self::Autumn => [1.0, v, 0.0],
            Self::Bone => {
                let [hr, hg, hb] = hot(1.0 - v);
                [
                    (7.0 * v + (1.0 - hb)) / 8.0,
                    (7.0 * v + (1.0 - hg)) / 8.0,
                    (7.0 * v + (1.0 - hr)) / 8.0,
                ]
            }
            Self::Jet => [
                1.5 - (4.0 * v - 3.0).abs(),
                1.5 - (4.0 * v - 2.0).abs(),
                1.5 - (4.0 * v - 1.0).abs(),
            ],
            Self::Winter => [0.0, v, 1.0 - v / 2.0],
            Self::Rainbow => hue_to_rgb(270.0 * (1.0 - v)),
            Self::Ocean => [3.0 * v - 2.0, ((3.0 * v - 1.0) / 2.0).abs(), v],
            Self::Summer => [v, 0.5 + v / 2.0, 0.4],
            Self::Spring => [1.0, v, 1.0 - v],
            Self::Cool => [v, 1.0 - v, 1.0],
            Self::Hsv => hue_to_rgb(360.0 * v),
            Self::Pink => {
                let [hr, hg, hb] = hot(v);
                [
                    ((2.0 * v + hr) / 3.0).sqrt(),
                    ((2.0 * v + hg) / 3.0).sqrt(),
                    ((2.0 * v + hb) / 3.0).sqrt(),
                ]
            }
            Self::Hot => hot(v),
        };
        [to_byte(r), to_byte(g), to_byte(b)]
    }
}

// Tabulated maps, sampled at evenly spaced points from 0.0 to 1.0 and
// linearly interpolated in between.
const PARULA: [[u8; 3]; 9] = [
    [53, 42, 135],
    [15, 92, 221],
    [18, 125, 216],
    [7, 156, 207],
    [21, 177, 180],
    [89, 189, 140],
    [165, 190, 107],
    [225, 185, 82],
    [249, 251, 14],
];

const MAGMA: [[u8; 3]; 9] = [
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

const INFERNO: [[u8; 3]; 9] = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

const PLASMA: [[u8; 3]; 9] = [
    [13, 8, 135],
    [75, 3, 161],
    [125, 3, 168],
    [168, 34, 150],
    [203, 70, 121],
    [229, 107, 93],
    [248, 148, 65],
    [253, 195, 40],
    [240, 249, 33],
];

const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 82, 139],
    [44, 114, 142],
    [33, 145, 140],
    [39, 173, 129],
    [94, 201, 98],
    [170, 220, 50],
    [253, 231, 37],
];

const CIVIDIS: [[u8; 3]; 9] = [
    [0, 34, 78],
    [18, 53, 112],
    [59, 73, 108],
    [87, 93, 109],
    [112, 113, 115],
    [138, 134, 120],
    [167, 157, 116],
    [199, 182, 103],
    [254, 232, 56],
];

/// Cyclic: both ends are the same light gray, darkest in the middle.
const TWILIGHT: [[u8; 3]; 9] = [
    [226, 217, 226],
    [166, 188, 203],
    [104, 140, 196],
    [95, 82, 178],
    [47, 20, 54],
    [116, 43, 88],
    [178, 90, 80],
    [208, 160, 145],
    [226, 217, 226],
];

const TURBO: [[u8; 3]; 9] = [
    [48, 18, 59],
    [70, 107, 227],
    [40, 188, 235],
    [50, 241, 152],
    [164, 252, 60],
    [237, 208, 58],
    [251, 128, 34],
    [210, 50, 5],
    [122, 4, 3],
];

const DEEP_GREEN: [[u8; 3]; 5] = [
    [0, 1, 0],
    [3, 57, 30],
    [20, 117, 44],
    [109, 178, 63],
    [251, 254, 224],
];

fn interpolate(table: &[[u8; 3]], v: f64) -> [u8; 3] {
    let last = table.len() - 1;
    let position = v * last as f64;
    let index = (position.floor() as usize).min(last.saturating_sub(1));
    let t = position - index as f64;
    let (lo, hi) = (table[index], table[(index + 1).min(last)]);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    [mix(lo[0], hi[0]), mix(lo[1], hi[1]), mix(lo[2], hi[2])]
}

fn hot(v: f64) -> [f64; 3] {
    [
        (3.0 * v).clamp(0.0, 1.0),
        (3.0 * v - 1.0).clamp(0.0, 1.0),
        (3.0 * v - 2.0).clamp(0.0, 1.0),
    ]
}

/// Fully saturated, full-value hue in degrees.
fn hue_to_rgb(hue: f64) -> [f64; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Colormap::Autumn)]
    #[case(2, Colormap::Jet)]
    #[case(11, Colormap::Hot)]
    #[case(12, Colormap::Parula)]
    #[case(16, Colormap::Viridis)]
    #[case(17, Colormap::Cividis)]
    #[case(20, Colormap::Turbo)]
    #[case(21, Colormap::DeepGreen)]
    fn test_from_id(#[case] id: i32, #[case] expected: Colormap) {
        assert_eq!(Colormap::from_id(id), Some(expected));
    }

    #[rstest]
    #[case(-1)]
    #[case(22)]
    #[case(99)]
    fn test_from_id_unknown(#[case] id: i32) {
        assert_eq!(Colormap::from_id(id), None);
    }

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(Colormap::Jet.apply(0.0), [0, 0, 128]);
        assert_eq!(Colormap::Jet.apply(1.0), [128, 0, 0]);
        assert_eq!(Colormap::Jet.apply(0.5), [128, 255, 128]);
    }

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(Colormap::Hot.apply(0.0), [0, 0, 0]);
        assert_eq!(Colormap::Hot.apply(1.0), [255, 255, 255]);
    }

    #[test]
    fn test_apply_clamps_out_of_range() {
        assert_eq!(Colormap::Autumn.apply(-3.0), Colormap::Autumn.apply(0.0));
        assert_eq!(Colormap::Autumn.apply(7.0), Colormap::Autumn.apply(1.0));
        assert_eq!(Colormap::Autumn.apply(f64::NAN), Colormap::Autumn.apply(0.0));
    }

    #[test]
    fn test_hsv_wraps_to_red() {
        assert_eq!(Colormap::Hsv.apply(0.0), [255, 0, 0]);
        assert_eq!(Colormap::Hsv.apply(1.0), [255, 0, 0]);
    }

    #[test]
    fn test_tabulated_maps_hit_their_anchors() {
        assert_eq!(Colormap::Viridis.apply(0.0), [68, 1, 84]);
        assert_eq!(Colormap::Viridis.apply(0.5), [33, 145, 140]);
        assert_eq!(Colormap::Viridis.apply(1.0), [253, 231, 37]);
        assert_eq!(Colormap::Parula.apply(1.0), [249, 251, 14]);
        assert_eq!(Colormap::Turbo.apply(0.5), [164, 252, 60]);
    }

    #[test]
    fn test_tabulated_maps_interpolate_between_anchors() {
        // Halfway between the first two viridis anchors.
        assert_eq!(Colormap::Viridis.apply(0.0625), [70, 23, 103]);
    }

    #[test]
    fn test_viridis_midpoint_is_teal() {
        let [r, g, b] = Colormap::Viridis.apply(0.5);
        assert!(g > r && b > r);
    }

    #[test]
    fn test_twilight_shifted_is_dark_at_the_ends() {
        assert_eq!(Colormap::TwilightShifted.apply(0.0), [47, 20, 54]);
        assert_eq!(Colormap::TwilightShifted.apply(0.5), [226, 217, 226]);
        assert_eq!(Colormap::Twilight.apply(0.0), Colormap::Twilight.apply(1.0));
    }
}
