pub mod domain;
pub mod error;
pub mod pnu;
pub mod protocol;
