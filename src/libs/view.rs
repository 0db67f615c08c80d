use super::task::Task;
use prettytable::{format, row, Table};

pub struct View {}

impl View {
    /// Prints the task table. Positions in the `#` column are what
    /// `toggle` and `delete` accept as selectors.
    pub fn tasks(tasks: &[Task]) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.set_titles(row!["#", "DUE", "DONE", "DESCRIPTION", "ID"]);
        for (position, task) in (1..).zip(tasks) {
            table.add_row(row![
                position,
                task.due_date.format("%Y-%m-%d"),
                Self::checkbox(task.completed),
                task.description,
                task.id
            ]);
        }
        table.printstd();
    }

    fn checkbox(completed: bool) -> &'static str {
        if completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}
