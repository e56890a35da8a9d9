//! Static font tables: what ships with the engine and what stands in for
//! fonts that do not.

/// A font file shipped in the bundled font directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundledFont {
    /// Lower-cased lookup name, e.g. `"dejavu sans bold"`.
    pub name: &'static str,
    /// File name inside the bundled font directory.
    pub file_name: &'static str,
}

/// An open alternative for a font that cannot be shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitute {
    /// Lower-cased requested name, e.g. `"calibri"`.
    pub requested: &'static str,
    /// Family name of the alternative.
    pub family: &'static str,
    /// Local file name the alternative is cached under.
    pub file_name: &'static str,
    /// Path of the file relative to the remote base URL. Empty when the
    /// alternative is itself bundled.
    pub remote_path: &'static str,
}

pub const SANS_FAMILY: &str = "DejaVu Sans";
pub const SERIF_FAMILY: &str = "DejaVu Serif";
pub const MONO_FAMILY: &str = "DejaVu Sans Mono";

pub const BUNDLED_FONTS: &[BundledFont] = &[
    BundledFont { name: "dejavu sans", file_name: "DejaVuSans.ttf" },
    BundledFont { name: "dejavu sans bold", file_name: "DejaVuSans-Bold.ttf" },
    BundledFont { name: "dejavu serif", file_name: "DejaVuSerif.ttf" },
    BundledFont { name: "dejavu serif bold", file_name: "DejaVuSerif-Bold.ttf" },
    BundledFont { name: "dejavu sans mono", file_name: "DejaVuSansMono.ttf" },
    BundledFont { name: "dejavu sans mono bold", file_name: "DejaVuSansMono-Bold.ttf" },
    // generic CSS-style family names
    BundledFont { name: "sans-serif", file_name: "DejaVuSans.ttf" },
    BundledFont { name: "sans-serif bold", file_name: "DejaVuSans-Bold.ttf" },
    BundledFont { name: "serif", file_name: "DejaVuSerif.ttf" },
    BundledFont { name: "serif bold", file_name: "DejaVuSerif-Bold.ttf" },
    BundledFont { name: "monospace", file_name: "DejaVuSansMono.ttf" },
    BundledFont { name: "monospace bold", file_name: "DejaVuSansMono-Bold.ttf" },
];

pub const SUBSTITUTES: &[Substitute] = &[
    Substitute {
        requested: "calibri",
        family: "Carlito",
        file_name: "Carlito-Regular.ttf",
        remote_path: "ofl/carlito/Carlito-Regular.ttf",
    },
    Substitute {
        requested: "calibri bold",
        family: "Carlito",
        file_name: "Carlito-Bold.ttf",
        remote_path: "ofl/carlito/Carlito-Bold.ttf",
    },
    Substitute {
        requested: "cambria",
        family: "Caladea",
        file_name: "Caladea-Regular.ttf",
        remote_path: "ofl/caladea/Caladea-Regular.ttf",
    },
    Substitute {
        requested: "cambria bold",
        family: "Caladea",
        file_name: "Caladea-Bold.ttf",
        remote_path: "ofl/caladea/Caladea-Bold.ttf",
    },
    Substitute {
        requested: "arial",
        family: "Arimo",
        file_name: "Arimo-Regular.ttf",
        remote_path: "apache/arimo/Arimo%5Bwght%5D.ttf",
    },
    Substitute {
        requested: "helvetica",
        family: "Arimo",
        file_name: "Arimo-Regular.ttf",
        remote_path: "apache/arimo/Arimo%5Bwght%5D.ttf",
    },
    Substitute {
        requested: "times new roman",
        family: "Tinos",
        file_name: "Tinos-Regular.ttf",
        remote_path: "apache/tinos/Tinos-Regular.ttf",
    },
    Substitute {
        requested: "times new roman bold",
        family: "Tinos",
        file_name: "Tinos-Bold.ttf",
        remote_path: "apache/tinos/Tinos-Bold.ttf",
    },
    Substitute {
        requested: "courier new",
        family: "Cousine",
        file_name: "Cousine-Regular.ttf",
        remote_path: "apache/cousine/Cousine-Regular.ttf",
    },
    Substitute {
        requested: "georgia",
        family: "Gelasio",
        file_name: "Gelasio-Regular.ttf",
        remote_path: "ofl/gelasio/Gelasio%5Bwght%5D.ttf",
    },
    Substitute {
        requested: "segoe ui",
        family: "Open Sans",
        file_name: "OpenSans-Regular.ttf",
        remote_path: "ofl/opensans/OpenSans%5Bwdth,wght%5D.ttf",
    },
    Substitute {
        requested: "gill sans",
        family: "Lato",
        file_name: "Lato-Regular.ttf",
        remote_path: "ofl/lato/Lato-Regular.ttf",
    },
    // stand-ins that are already bundled
    Substitute {
        requested: "verdana",
        family: SANS_FAMILY,
        file_name: "DejaVuSans.ttf",
        remote_path: "",
    },
    Substitute {
        requested: "consolas",
        family: MONO_FAMILY,
        file_name: "DejaVuSansMono.ttf",
        remote_path: "",
    },
    Substitute {
        requested: "menlo",
        family: MONO_FAMILY,
        file_name: "DejaVuSansMono.ttf",
        remote_path: "",
    },
];

/// Lower-cases and collapses whitespace so `"  Times   New Roman "` and
/// `"times new roman"` share a cache entry.
pub fn normalize_font_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn find_bundled(normalized: &str) -> Option<&'static BundledFont> {
    BUNDLED_FONTS.iter().find(|f| f.name == normalized)
}

pub fn find_substitute(normalized: &str) -> Option<&'static Substitute> {
    SUBSTITUTES.iter().find(|s| s.requested == normalized)
}
