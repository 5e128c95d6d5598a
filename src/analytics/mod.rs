//! Derived metrics engine.
//!
//! Each module is a pure transform from an issue slice to a
//! presentation-ready summary struct for one analytic domain. Summaries
//! signal the empty case explicitly so the popovers can show a stock empty
//! state instead of a broken chart. Anything that needs "today" takes it as
//! a frozen `NaiveDate` parameter so one aggregation pass stays internally
//! consistent.

pub mod budget;
pub mod comments;
pub mod dates;
pub mod deps;
pub mod group;
pub mod pie;
pub mod points;
pub mod rollup;
pub mod slippage;
pub mod time;
