// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://davidar.github.io/tp/kama-sona";
pub const USER_AGENT: &str = concat!("kama_sona_scrape/", env!("CARGO_PKG_VERSION"));

// Local files
pub const DEFAULT_RECORDS_FILE: &str = "scraped data.ods";
pub const DEFAULT_DOCUMENT_FILE: &str = "kama sona.ods";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_EDITABLE_DIR: &str = "editable_images";

// Spreadsheet layout
pub const RECORDS_TABLE_NAME: &str = "scraped data";
pub const RECORDS_HEADERS: [&str; 2] = ["Image URL", "Text"];
pub const DOCUMENT_TABLE_NAME: &str = "kama sona data";
pub const DOCUMENT_HEADERS: [&str; 2] = ["Column 1", "Column 2"];

// Emphasis run style
pub const EMPHASIS_STYLE_NAME: &str = "EmphasizedTextColor";
pub const EMPHASIS_COLOR: &str = "#FFA500"; // orange

// Embedded images
pub const FALLBACK_IMAGE_PX: f64 = 50.0;
