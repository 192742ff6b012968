pub(crate) mod boundary;
pub(crate) mod extractor;
pub(crate) mod sample;
pub(crate) mod simplify;
pub(crate) mod triangulate;
