pub mod controller;
pub mod dtos;
pub mod errors;
pub mod models;
pub mod service;
pub mod util;

pub static FIRST_IMAGE_ID: u32 = 64;
pub static DATASET_DIR_NAME: &str = "Dataset";
pub static ARCHIVE_FILE_NAME: &str = "generated_images.zip";
