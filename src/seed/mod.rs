pub mod defaults;
pub mod io;

pub use defaults::default_use_cases;
pub use io::{export_scored_csv, load_seed, read_use_cases, write_scored_csv};
