pub use visit_counter_core::{config, contract};
