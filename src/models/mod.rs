pub mod patch;
pub mod status;
