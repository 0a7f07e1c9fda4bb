//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer summarizes a finished image:
//! - Weight conservation (deposited versus offered weight)
//! - Source bookkeeping (culled and off-grid sources)
//! - Peak and coverage statistics
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Image diagnostics and source bookkeeping.
pub mod diagnostics;
