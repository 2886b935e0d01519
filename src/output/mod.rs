pub mod formatter;

pub use formatter::{
    format_json, format_ranked_table, format_score, format_summary, format_tsv,
    format_use_case_detail, should_use_colors, truncate_name,
};
