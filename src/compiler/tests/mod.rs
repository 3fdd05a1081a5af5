//! Compiler unit tests.

mod dialects;
