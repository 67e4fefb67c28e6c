//! Custom widgets.

pub mod clip_list;
