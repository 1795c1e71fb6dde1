//! Route ordering for Courier backed by `vrp-core`.
//!
//! This crate provides [`VrpRouteOptimizer`], the default implementation of
//! the [`RouteOptimizer`](courier_core::RouteOptimizer) trait. Each vehicle's
//! stops become jobs of a single-vehicle VRP that starts at the depot and has
//! no end location, so the metaheuristic searches for the shortest open path
//! over the penalised travel-time matrix.
//!
//! The optimiser never fails at the API boundary: modelling or solver errors
//! are logged and the input order is kept.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod optimizer;
mod vrp;

pub use optimizer::{VrpOptimizerConfig, VrpRouteOptimizer};
