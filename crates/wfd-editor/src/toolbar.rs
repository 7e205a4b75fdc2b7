//! Toolbar model: which buttons are visible, and what they do.
//!
//! The toolbar has an activity section (delete, edit) shown only while an
//! activity is selected, and a center button that is always shown.

use serde::Serialize;
use wfd_core::model::Activity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarState {
    pub activity_bar_visible: bool,
    pub delete_visible: bool,
}

impl ToolbarState {
    pub fn for_selection(selected: Option<&Activity>, is_read_only: bool) -> Self {
        match selected {
            Some(activity) => Self {
                activity_bar_visible: true,
                delete_visible: activity.can_delete && !is_read_only,
            },
            None => Self {
                activity_bar_visible: false,
                delete_visible: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    DeleteSelected,
    EditSelected,
    Center,
}
