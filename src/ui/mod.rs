pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, neo_line, section, success, summary_row, warn};
pub use progress::Spinner;
pub use table::{approach_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
