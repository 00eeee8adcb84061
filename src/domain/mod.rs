//! Tool definitions and the arithmetic behind them

pub mod calculator;
pub mod tools;
