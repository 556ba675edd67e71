//! State module for tracking batch progress
//!
//! A run moves through a fixed sequence of phases; `BatchState` names them and
//! knows which transitions are legal.

mod batch_state;

pub use batch_state::BatchState;
