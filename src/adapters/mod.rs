pub(crate) mod params;
pub(crate) mod result_set;
