//! Wire codecs shared by the oracle workflows.
//!
//! Everything in this crate is pure: no I/O, no clocks. Node tasks use it
//! to build requests and decode responses, and the workflow engine uses it
//! to scale amounts and assemble report payloads.

#![deny(unsafe_code)]

pub mod abi;
pub mod amount;
pub mod delimited;
mod error;
pub mod payload;
pub mod quantity;
pub mod rpc;
pub mod text;

pub use abi::{parse_address, selector, Token};
pub use amount::{format_units, parse_decimal_amount};
pub use delimited::{DelimitedRecord, ERROR_SENTINEL};
pub use error::CodecError;
pub use payload::{base64_to_bytes, bytes_to_base64};
pub use quantity::{decode_hex_quantity, decode_word_bool, encode_hex_quantity};
pub use rpc::{RpcCall, RpcReply};
