pub mod banner;
pub mod client;
pub mod consts;
pub mod relay;
pub mod speech;
pub mod spinner;
pub mod upstream;
