//! System query option decoding.

use odata_proto::QueryOptions;
use url::form_urlencoded;

use crate::error::ParseError;
use crate::filter::parse_filter;
use crate::order_by::parse_order_by;
use crate::select::parse_select;

/// Name of the filter option.
pub const FILTER: &str = "$filter";
/// Name of the ordering option.
pub const ORDER_BY: &str = "$orderby";
/// Name of the projection option.
pub const SELECT: &str = "$select";

/// Decode a URL query string and parse its system query options.
///
/// Parameters other than `$filter`, `$orderby` and `$select` are ignored.
/// When an option is repeated the first occurrence is used.
pub fn parse_query_options(query_string: &str) -> Result<QueryOptions, ParseError> {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);

    let mut filter = None;
    let mut order_by = None;
    let mut select = None;

    for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
        let slot = match key.as_ref() {
            FILTER => &mut filter,
            ORDER_BY => &mut order_by,
            SELECT => &mut select,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    parse_options(filter.as_deref(), order_by.as_deref(), select.as_deref())
}

/// Parse already-decoded option values.
pub fn parse_options(
    filter: Option<&str>,
    order_by: Option<&str>,
    select: Option<&str>,
) -> Result<QueryOptions, ParseError> {
    let mut options = QueryOptions::new();

    if let Some(raw) = filter {
        options = options.with_filter(parse_filter(raw)?);
    }
    if let Some(raw) = order_by {
        options = options.with_order_by(parse_order_by(raw)?);
    }
    if let Some(raw) = select {
        options.select = parse_select(raw)?;
    }

    Ok(options)
}
