//! Column schema of the feature table.
//!
//! Names and order are fixed by what the pipeline was fitted on.

pub const BRAND: &str = "Brand";
pub const PROCESSOR: &str = "Processor";
/// Storage capacity in GB.
pub const STORAGE_GB: &str = "SSD(GB)";
/// Screen diagonal in inches.
pub const SCREEN_SIZE: &str = "Ukuran Layar";
pub const RAM_GB: &str = "RAM(GB)";
/// Operating system.
pub const OS: &str = "Sistem Operasi";
pub const GPU_BRAND: &str = "GPU_brand";
pub const GPU_MODEL: &str = "GPU_model";
/// GPU memory in GB.
pub const GPU_MEMORY_GB: &str = "GPU_vram";
/// CPU generation.
pub const GENERATION: &str = "Gen_processor";
/// CPU series letter code.
pub const SERIES: &str = "Seri_processor";

/// Feature table columns, in table order.
pub const FEATURE_COLUMNS: [&str; 11] = [
    BRAND,
    PROCESSOR,
    STORAGE_GB,
    SCREEN_SIZE,
    RAM_GB,
    OS,
    GPU_BRAND,
    GPU_MODEL,
    GPU_MEMORY_GB,
    GENERATION,
    SERIES,
];

/// How a column is stored in the feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// String level drawn from a fixed set.
    Categorical,
    /// Integer or float quantity.
    Numeric,
}

/// Returns the storage kind of a feature column, or `None` for unknown names.
pub fn column_kind(name: &str) -> Option<ColumnKind> {
    match name {
        BRAND | PROCESSOR | OS | GPU_BRAND | GPU_MODEL | SERIES => Some(ColumnKind::Categorical),
        STORAGE_GB | SCREEN_SIZE | RAM_GB | GPU_MEMORY_GB | GENERATION => {
            Some(ColumnKind::Numeric)
        }
        _ => None,
    }
}
