//! Command implementations for OxiFax CLI.

pub mod fax;
pub mod info;
pub mod lzw;

pub use fax::{FaxOptions, cmd_fax_decode, cmd_fax_encode};
pub use info::cmd_info;
pub use lzw::{cmd_lzw_decode, cmd_lzw_encode};
