//! One-shot commands

pub mod ask;
