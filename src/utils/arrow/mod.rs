//! Arrow array helpers shared by the normalizer, the filters and the exporters.

pub mod array_utils;
pub mod conversion;

pub use array_utils::{column_as_text, column_as_utf8, downcast_array, get_column};
pub use conversion::{ArrowSchema, rows_to_batch};
