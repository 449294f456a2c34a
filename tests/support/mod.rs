#![allow(dead_code)]

pub mod assertions;
pub mod graphs;
pub mod quote;
