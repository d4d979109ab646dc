#![allow(dead_code)]

pub mod pipeline;
