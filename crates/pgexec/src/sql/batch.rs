use super::Param;
use std::fmt::Write;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Positional placeholder prefix (`$1, $2, ...`).
pub const PLACEHOLDER_PREFIX: char = '$';

/// Encode `values` as a parenthesized placeholder list starting at `start`.
///
/// `["a", "b", "c"]` at `5` renders `($5,$6,$7)` and returns the three values
/// as parameters, in order.
///
/// An empty input renders an empty string (not `()`) and no parameters.
pub fn encode_batch<T>(values: impl IntoIterator<Item = T>, start: usize) -> (String, Vec<Param>)
where
    T: ToSql + Sync + Send + 'static,
{
    let iter = values.into_iter();
    let mut params: Vec<Param> = Vec::with_capacity(iter.size_hint().0);
    let mut list = String::new();

    for (offset, value) in iter.enumerate() {
        list.push(if offset == 0 { '(' } else { ',' });
        list.push(PLACEHOLDER_PREFIX);
        // Writing to a String is infallible.
        let _ = write!(list, "{}", start + offset);
        params.push(Arc::new(value));
    }

    if !params.is_empty() {
        list.push(')');
    }
    (list, params)
}
