pub(crate) mod list;
pub(crate) mod meta;
pub(crate) mod shared;
pub(crate) mod status;
pub(crate) mod transition;
