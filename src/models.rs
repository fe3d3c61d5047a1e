pub mod charges;
pub mod gifts;
