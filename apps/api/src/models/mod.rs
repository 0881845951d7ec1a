pub mod correction;
pub mod profile;
pub mod theme;
