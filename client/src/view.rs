//! Read-only projections of the task collection: filtering, sorting, the
//! board grouping, and the reorder plan behind a card move.

use std::cmp::Ordering;

use tasko_shared::{Priority, Task, TaskStatus};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Status,
    Priority,
    DueDate,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Title, SortKey::Status, SortKey::Priority, SortKey::DueDate];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Title => "Title",
            SortKey::Status => "Status",
            SortKey::Priority => "Priority",
            SortKey::DueDate => "Due Date",
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::Priority => a.priority.as_str().cmp(b.priority.as_str()),
            SortKey::DueDate => a.due_date.cmp(&b.due_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub sort: Option<SortSpec>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub search: String,
}

impl ViewConfig {
    /// Same key flips the direction, a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let direction = match self.sort {
            Some(SortSpec {
                key: current,
                direction: SortDirection::Ascending,
            }) if current == key => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec { key, direction });
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }

        let needle = self.search.to_lowercase();
        needle.is_empty()
            || task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Filtered, then stably sorted. The input order is the tie-break.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut shown: Vec<&Task> = tasks.iter().filter(|task| self.matches(task)).collect();

        if let Some(SortSpec { key, direction }) = self.sort {
            shown.sort_by(|a, b| match direction {
                SortDirection::Ascending => key.compare(a, b),
                SortDirection::Descending => key.compare(b, a),
            });
        }
        shown
    }

    /// The three board columns, each in collection order.
    pub fn board<'a>(&self, tasks: &'a [Task]) -> [Vec<&'a Task>; 3] {
        let mut columns: [Vec<&Task>; 3] = Default::default();
        for task in tasks.iter().filter(|task| self.matches(task)) {
            columns[task.status.column_index()].push(task);
        }
        columns
    }
}

/// Where a dragged card is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// On top of another card; the card takes that slot and its column.
    Task(String),
    /// On a column outside any card; the card goes last in that column.
    Column(TaskStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    /// The reordered collection, with `moved` already in place.
    pub tasks: Vec<Task>,
    pub moved: Task,
}

/// Plans a card move without touching `tasks`. `Ok(None)` means the card
/// was dropped where it already is.
pub fn plan_move(tasks: &[Task], active_id: &str, target: &DropTarget) -> Result<Option<MovePlan>> {
    let from = index_of(tasks, active_id)?;

    let (to, status) = match target {
        DropTarget::Task(over_id) if over_id == active_id => return Ok(None),
        DropTarget::Task(over_id) => {
            let to = index_of(tasks, over_id)?;
            (to, tasks[to].status)
        }
        DropTarget::Column(status) => {
            let last_in_column = tasks.iter().rposition(|task| task.status == *status);
            if last_in_column == Some(from) {
                return Ok(None);
            }
            (tasks.len() - 1, *status)
        }
    };

    let mut reordered = tasks.to_vec();
    let mut moved = reordered.remove(from);
    moved.status = status;
    reordered.insert(to, moved.clone());

    Ok(Some(MovePlan {
        tasks: reordered,
        moved,
    }))
}

fn index_of(tasks: &[Task], id: &str) -> Result<usize> {
    tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| ClientError::NotFound(format!("task {id} not found")))
}
