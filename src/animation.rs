pub(crate) mod descriptor;
pub(crate) mod ease;
pub(crate) mod keyframes;
pub(crate) mod normalize;
