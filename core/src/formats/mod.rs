pub mod plt;

pub(crate) mod util;
