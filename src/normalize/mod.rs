//! Leaf normalizers shared by every dataset shaper: header keys, localized
//! numbers and the ratio-or-percent policy.

pub mod numeric;
pub mod text;

pub use numeric::{looks_numeric, normalize_percent, parse_number, parse_number_str, value_text};
pub use text::{column_order, normalize_key, resolve_column, ColumnReference};
