//! Pipeline integration tests
//!
//! ```bash
//! cargo test --test pipeline_tests
//! ```

mod pipeline;
