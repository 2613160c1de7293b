use std::sync::LazyLock;

use regex::Regex;

use super::listing::ListingEntry;

static ENDIAN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.*\D)(?P<num>\d+)(?P<endian>[lb]e)$")
        .expect("endian suffix pattern is valid")
});

static NUMBER_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.*\D)(?P<num>\d+)$").expect("number suffix pattern is valid")
});

static PLANAR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:yuv[aj]?\d{3}p|gbra?p)").expect("planar name pattern is valid")
});

const YUV_LETTERS: &str = "yuvajp4210";
const RGB_LETTERS: &str = "bgra0p";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

/// What the `-pix_fmts` listing says about one pixel format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelFormatDescriptor {
    name: String,
    components: u32,
    bits_per_pixel: u32,
    bit_depths: Option<Vec<u32>>,
    endianness: Option<Endianness>,
    hardware: bool,
    bitstream: bool,
}

impl PixelFormatDescriptor {
    pub fn new(name: impl Into<String>, components: u32, bits_per_pixel: u32) -> Self {
        Self {
            name: name.into(),
            components,
            bits_per_pixel,
            bit_depths: None,
            endianness: None,
            hardware: false,
            bitstream: false,
        }
    }

    pub fn with_bit_depths(mut self, bit_depths: Vec<u32>) -> Self {
        self.bit_depths = Some(bit_depths);
        self
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    /// Builds a descriptor from a listing row.
    ///
    /// Component count and bits per pixel come from the named columns,
    /// or from the leading description tokens when the listing declares
    /// no columns. Missing bit depths are guessed from the name.
    pub fn from_entry(entry: &ListingEntry) -> Option<Self> {
        let tokens: Vec<&str> = entry.description().split_whitespace().collect();
        let column = |field: &str, index: usize| {
            entry.field(field).or_else(|| tokens.get(index).copied())
        };
        let name = entry.name();
        let components: u32 = column("NB_COMPONENTS", 0)?.parse().ok()?;
        let bits_per_pixel: u32 = column("BITS_PER_PIXEL", 1)?.parse().ok()?;
        let bit_depths = column("BIT_DEPTHS", 2)
            .and_then(parse_bit_depths)
            .or_else(|| guess_bit_depths(name, components, bits_per_pixel));

        Some(Self {
            name: name.to_string(),
            components,
            bits_per_pixel,
            bit_depths,
            endianness: endianness_of(name),
            hardware: entry.has_flag('H'),
            bitstream: entry.has_flag('B'),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> u32 {
        self.components
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn bit_depths(&self) -> Option<&[u32]> {
        self.bit_depths.as_deref()
    }

    /// The common depth when every component has the same width.
    pub fn uniform_depth(&self) -> Option<u32> {
        let depths = self.bit_depths.as_deref()?;
        let (&first, rest) = depths.split_first()?;
        rest.iter().all(|&d| d == first).then_some(first)
    }

    pub fn endianness(&self) -> Option<Endianness> {
        self.endianness
    }

    pub fn is_hardware(&self) -> bool {
        self.hardware
    }

    pub fn is_bitstream(&self) -> bool {
        self.bitstream
    }

    /// One plane per component (`yuv444p`, `gbrp10le`, `yuv420p`...).
    pub fn is_planar(&self) -> bool {
        PLANAR_NAME.is_match(&self.name)
    }
}

fn parse_bit_depths(text: &str) -> Option<Vec<u32>> {
    text.split('-').map(|d| d.parse().ok()).collect()
}

fn endianness_of(name: &str) -> Option<Endianness> {
    let caps = ENDIAN_SUFFIX.captures(name)?;
    match &caps["endian"] {
        "be" => Some(Endianness::Big),
        _ => Some(Endianness::Little),
    }
}

fn made_of(letters: &str, text: &str) -> bool {
    text.chars().all(|c| letters.contains(c))
}

/// Per-component depths for listings that print no BIT_DEPTHS column.
fn guess_bit_depths(name: &str, components: u32, bits_per_pixel: u32) -> Option<Vec<u32>> {
    if components == 0 {
        return None;
    }
    let uniform = |depth: u32| Some(vec![depth; components as usize]);
    let bayer = |prefix: &str, num: u32| {
        (prefix.starts_with("bayer") && components == 3 && num > 0 && num % 4 == 0)
            .then(|| vec![num / 4, num / 2, num / 4])
    };

    if let Some(caps) = ENDIAN_SUFFIX.captures(name) {
        let prefix = &caps["prefix"];
        let digits = &caps["num"];
        let num: u32 = digits.parse().ok()?;
        if let Some(depths) = bayer(prefix, num) {
            return Some(depths);
        }
        if num == bits_per_pixel && num > 0 && num % components == 0 {
            return uniform(num / components);
        }
        if prefix == "nv" && num > 0 && num % 2 == 0 {
            return uniform(num / 2);
        }
        if prefix == "p" || prefix == "y" {
            return uniform(num % 100);
        }
        if num < 100 {
            return uniform(num);
        }
        if digits.len() == components as usize {
            return digits.chars().map(|c| c.to_digit(10)).collect();
        }
        return None;
    }

    if let Some(caps) = NUMBER_SUFFIX.captures(name) {
        let prefix = &caps["prefix"];
        let num: u32 = caps["num"].parse().ok()?;
        if let Some(depths) = bayer(prefix, num) {
            return Some(depths);
        }
        if made_of(RGB_LETTERS, prefix) && num > 0 && num % components == 0 {
            return uniform(num / components);
        }
        if made_of(YUV_LETTERS, prefix)
            || matches!(prefix, "nv" | "pal" | "ya")
            || (made_of(RGB_LETTERS, prefix) && num == 0)
        {
            return uniform(8);
        }
        return None;
    }

    if made_of(RGB_LETTERS, name) || name == "gray" || made_of(YUV_LETTERS, name) {
        return uniform(8);
    }
    None
}
