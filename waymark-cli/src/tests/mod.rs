//! Shared test harness modules for the Waymark CLI.

use super::*;

mod helpers;
mod run_unit;
