pub(crate) mod correspond;
pub(crate) mod hull;
pub(crate) mod triangulate;
