pub mod analysis;
pub mod input;
pub mod tax;
pub mod update;
