pub(crate) mod average;
pub(crate) mod swap;
