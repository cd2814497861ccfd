mod distinct_pushdown;
mod filter_pushdown;
mod join_order;
mod projection_pushdown;
mod runner;
mod test_utils;
