//! Read models rendered by UI shells.

pub mod planner_view;
