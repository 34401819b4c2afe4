pub mod network;
pub mod scaling;
