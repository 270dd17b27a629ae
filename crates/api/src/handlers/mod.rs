pub mod asset_import;
pub mod map;
