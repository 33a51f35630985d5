pub(crate) mod affine;
pub(crate) mod triangle;
