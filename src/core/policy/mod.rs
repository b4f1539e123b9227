//! Enforcement policy objects and publication
//!
//! Policies are derived state: one token-rate and one request-rate object
//! per team, always recomputable from the team record, upserted on create
//! and sync, retracted best-effort on delete.

mod publisher;
mod types;

#[cfg(test)]
mod tests;

pub use publisher::PolicyPublisher;
pub use types::{
    CounterExpr, CounterScope, LimitRule, PolicyKind, PolicyObject, PolicySpec, RateEntry,
    TargetRef, WhenPredicate,
};
