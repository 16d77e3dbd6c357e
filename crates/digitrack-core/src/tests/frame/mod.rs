#[allow(clippy::module_inception)]
mod frame;
mod detector;
mod source;
