pub mod divergence;
pub mod error;
pub mod execution_opinion;
pub mod opinion_pool;
pub mod random_states;
pub mod trace_entry;
