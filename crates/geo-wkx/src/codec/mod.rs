//! WKB and WKT encoding/decoding.
//!
//! Both formats are read by recursive descent and built through a
//! [`GeometryFactory`](crate::model::GeometryFactory).

pub mod byte_order;
pub mod primitives;
pub mod tokenizer;
pub mod type_code;
pub mod wkb;
pub mod wkt;

pub use byte_order::{ByteOrder, machine_byte_order};
pub use primitives::{WkbBuffer, WkbCursor};
pub use tokenizer::{Token, TokenKind, TokenStream, tokenize};
pub use type_code::{TYPE_CODE_LIMIT, WkbTypeCode};
pub use wkb::{WkbOptions, WkbWriter, read_wkb, read_wkb_with, write_wkb};
pub use wkt::{WktOptions, WktWriter, read_wkt, read_wkt_with, write_wkt};
