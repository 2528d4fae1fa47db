//! Dispatch integration tests.

mod support;

mod basic;
mod remote;
