//! Enumerated and bounded domains for every feature record field.
//!
//! The presentation layer offers only these choices. The fitted pipeline may
//! know a different set of levels; records are checked against this catalog
//! with [`crate::FeatureRecord::validate`], not by the pipeline.

use std::ops::RangeInclusive;

use crate::schema;

pub const BRANDS: &[&str] = &["ASUS", "ACER", "MSI", "HP", "LENOVO", "GIGABYTE", "DELL", "RAZER"];

pub const PROCESSORS: &[&str] = &[
    "Intel i3",
    "Intel i5",
    "Intel i7",
    "Intel i9",
    "AMD Ryzen 5",
    "AMD Ryzen 7",
    "AMD Ryzen 9",
];

pub const SERIES: &[&str] = &["H", "P", "U", "HX", "HS", "G"];

pub const OPERATING_SYSTEMS: &[&str] = &["Windows 10", "Windows 11", "Linux", "macOS"];

pub const GPU_BRANDS: &[&str] = &["NVIDIA", "AMD", "Intel"];

pub const GPU_MODELS: &[&str] = &[
    "RTX 3050",
    "RTX 3050TI",
    "RTX 3060",
    "RTX 3060TI",
    "RTX 3070",
    "RTX 3070TI",
    "RTX 3080",
    "RTX 3080TI",
    "RTX 4050",
    "RTX 4050TI",
    "RTX 4060",
    "RTX 4060TI",
    "RTX 4070",
    "RTX 4070TI",
    "RTX 4080",
    "RTX 4080TI",
    "RTX 4090",
    "RTX 4090TI",
    "Radeon RX 6600M",
];

pub const GENERATIONS: RangeInclusive<i64> = 8..=14;

pub const RAM_OPTIONS_GB: &[i64] = &[4, 8, 16, 24, 32, 64];

pub const STORAGE_MIN_GB: i64 = 128;
pub const STORAGE_MAX_GB: i64 = 4096;
pub const STORAGE_STEP_GB: i64 = 128;

pub const SCREEN_SIZES: &[f64] = &[13.3, 14.0, 15.6, 16.0, 17.0, 18.0];

/// Zero means integrated graphics.
pub const GPU_MEMORY_OPTIONS_GB: &[i64] = &[0, 4, 6, 8, 16, 24, 32, 64];

/// Screen sizes closer than this to a listed size count as that size.
const SCREEN_TOLERANCE: f64 = 1e-6;

/// Shape of one field's domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainKind {
    /// Fixed set of string levels.
    Levels(&'static [&'static str]),
    /// Fixed set of integers.
    Integers(&'static [i64]),
    /// Inclusive integer range, stepping from `min`.
    Stepped { min: i64, max: i64, step: i64 },
    /// Fixed set of floats.
    Sizes(&'static [f64]),
}

impl DomainKind {
    pub fn contains_level(&self, value: &str) -> bool {
        match self {
            DomainKind::Levels(levels) => levels.contains(&value),
            _ => false,
        }
    }

    pub fn contains_integer(&self, value: i64) -> bool {
        match self {
            DomainKind::Integers(options) => options.contains(&value),
            DomainKind::Stepped { min, max, step } => {
                (*min..=*max).contains(&value) && (value - min) % step == 0
            }
            _ => false,
        }
    }

    pub fn contains_size(&self, value: f64) -> bool {
        match self {
            DomainKind::Sizes(sizes) => sizes
                .iter()
                .any(|size| (size - value).abs() < SCREEN_TOLERANCE),
            _ => false,
        }
    }

    /// Human readable summary of the allowed values.
    pub fn describe(&self) -> String {
        match self {
            DomainKind::Levels(levels) => levels.join(", "),
            DomainKind::Integers(options) => options
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            DomainKind::Stepped { min, max, step } if *step == 1 => format!("{min}..={max}"),
            DomainKind::Stepped { min, max, step } => {
                format!("{min}..={max} in steps of {step}")
            }
            DomainKind::Sizes(sizes) => sizes
                .iter()
                .map(|size| format!("{size:.1}"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Domain of one record field, keyed by its feature column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDomain {
    pub column: &'static str,
    pub label: &'static str,
    pub kind: DomainKind,
}

/// Domains for all eleven fields, in feature table order.
pub fn field_domains() -> Vec<FieldDomain> {
    vec![
        FieldDomain {
            column: schema::BRAND,
            label: "Brand",
            kind: DomainKind::Levels(BRANDS),
        },
        FieldDomain {
            column: schema::PROCESSOR,
            label: "Processor",
            kind: DomainKind::Levels(PROCESSORS),
        },
        FieldDomain {
            column: schema::STORAGE_GB,
            label: "Storage (GB)",
            kind: DomainKind::Stepped {
                min: STORAGE_MIN_GB,
                max: STORAGE_MAX_GB,
                step: STORAGE_STEP_GB,
            },
        },
        FieldDomain {
            column: schema::SCREEN_SIZE,
            label: "Screen size (in)",
            kind: DomainKind::Sizes(SCREEN_SIZES),
        },
        FieldDomain {
            column: schema::RAM_GB,
            label: "RAM (GB)",
            kind: DomainKind::Integers(RAM_OPTIONS_GB),
        },
        FieldDomain {
            column: schema::OS,
            label: "Operating system",
            kind: DomainKind::Levels(OPERATING_SYSTEMS),
        },
        FieldDomain {
            column: schema::GPU_BRAND,
            label: "GPU brand",
            kind: DomainKind::Levels(GPU_BRANDS),
        },
        FieldDomain {
            column: schema::GPU_MODEL,
            label: "GPU model",
            kind: DomainKind::Levels(GPU_MODELS),
        },
        FieldDomain {
            column: schema::GPU_MEMORY_GB,
            label: "GPU memory (GB)",
            kind: DomainKind::Integers(GPU_MEMORY_OPTIONS_GB),
        },
        FieldDomain {
            column: schema::GENERATION,
            label: "Generation",
            kind: DomainKind::Stepped {
                min: *GENERATIONS.start(),
                max: *GENERATIONS.end(),
                step: 1,
            },
        },
        FieldDomain {
            column: schema::SERIES,
            label: "Series",
            kind: DomainKind::Levels(SERIES),
        },
    ]
}

/// Looks up the domain of a feature column.
pub fn domain_for(column: &str) -> Option<FieldDomain> {
    field_domains().into_iter().find(|domain| domain.column == column)
}
