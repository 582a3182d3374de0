pub mod formatter;

pub use formatter::{
    format_college_groups, format_college_line, format_dashboard, format_points, format_profile,
    format_readiness, format_task_groups, format_task_line, format_task_list, progress_bar,
    should_use_colors,
};
