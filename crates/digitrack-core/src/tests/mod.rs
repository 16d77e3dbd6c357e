#![allow(clippy::panic)]

mod activity;
mod frame;
