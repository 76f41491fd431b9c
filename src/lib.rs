pub mod error;
pub mod icon_gen;
pub mod manifest_json;
