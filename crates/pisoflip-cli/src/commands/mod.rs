pub mod deal;
pub mod tax;
