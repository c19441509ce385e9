pub(crate) mod fallback;
pub(crate) mod flight_table;
pub(crate) mod footer;
pub(crate) mod header;
pub(crate) mod ticker;
