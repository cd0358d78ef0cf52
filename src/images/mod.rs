pub(crate) mod normalize;
pub(crate) mod order;
pub(crate) mod resolve;
