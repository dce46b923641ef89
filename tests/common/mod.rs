#![allow(dead_code)]

pub mod tracing_capture;
