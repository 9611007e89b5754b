//! Shared test support: document fixtures and in-memory fakes
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;
