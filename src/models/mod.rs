pub mod source;
pub mod webhook;
