pub mod back_to_top;
pub mod collapsibles;
pub mod email_copier;
pub mod scroll_progress;
pub mod section_highlighter;
pub mod smooth_scroll;
