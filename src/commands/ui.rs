//! The interactive task list: table, creation form, per-row toggle and
//! delete, logout. Whenever the session disappears the login prompt takes
//! over and the list is mounted again afterwards.

use super::{login, open_backend, tasks};
use crate::{
    api::{AuthProvider, TaskBackend},
    libs::{
        controller::{TaskListController, ViewState},
        guard::ConsoleNavigator,
        messages::Message,
        task::DUE_DATE_FORMAT,
    },
    msg_error,
};
use anyhow::Result;
use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::sync::Arc;

enum Action {
    Add,
    Toggle,
    Delete,
    Refresh,
    Logout,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::Add,
        Action::Toggle,
        Action::Delete,
        Action::Refresh,
        Action::Logout,
        Action::Quit,
    ];

    fn label(&self) -> String {
        match self {
            Action::Add => Message::MenuAddTask,
            Action::Toggle => Message::MenuToggleTask,
            Action::Delete => Message::MenuDeleteTask,
            Action::Refresh => Message::MenuRefresh,
            Action::Logout => Message::MenuLogout,
            Action::Quit => Message::MenuQuit,
        }
        .to_string()
    }
}

pub async fn cmd() -> Result<()> {
    let (auth, backend) = open_backend()?;
    let navigator = Arc::new(ConsoleNavigator::new());

    loop {
        let mut controller = TaskListController::mount(&auth, &backend, navigator.clone()).await;

        if controller.state() == ViewState::Unauthenticated {
            controller.unmount();
            navigator.take_redirect();
            if !login::prompt(&auth).await? {
                return Ok(());
            }
            continue;
        }

        let quit = run(&mut controller, &navigator).await?;
        controller.unmount();
        if quit {
            return Ok(());
        }
    }
}

/// Drives one mounted list. Returns `true` when the user quits and `false`
/// when the session ended.
async fn run<A: AuthProvider, B: TaskBackend>(
    controller: &mut TaskListController<'_, A, B>,
    navigator: &ConsoleNavigator,
) -> Result<bool> {
    let labels: Vec<String> = Action::ALL.iter().map(Action::label).collect();

    loop {
        tasks::finish(controller);
        if navigator.take_redirect() || controller.state() == ViewState::Unauthenticated {
            return Ok(false);
        }

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectAction.to_string())
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[selection] {
            Action::Add => {
                let description: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptDescription.to_string())
                    .allow_empty(true)
                    .interact_text()?;
                let due_date: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptDueDate.to_string())
                    .default(Local::now().date_naive().format(DUE_DATE_FORMAT).to_string())
                    .interact_text()?;
                if let Err(e) = controller.submit(&description, &due_date).await {
                    msg_error!(e);
                }
            }
            Action::Toggle => {
                if let Some(id) = pick_task(controller)? {
                    controller.toggle_task(id).await;
                }
            }
            Action::Delete => {
                if let Some(id) = pick_task(controller)? {
                    if tasks::confirm_delete(controller, id)? {
                        controller.remove_task(id).await;
                    }
                }
            }
            Action::Refresh => controller.refresh().await,
            Action::Logout => controller.sign_out().await,
            Action::Quit => return Ok(true),
        }
    }
}

fn pick_task<A: AuthProvider, B: TaskBackend>(controller: &TaskListController<'_, A, B>) -> Result<Option<uuid::Uuid>> {
    let tasks = controller.tasks();
    if tasks.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = tasks
        .iter()
        .map(|task| {
            let mark = if task.completed { "[x]" } else { "[ ]" };
            format!("{} {} {}", mark, task.due_date.format(DUE_DATE_FORMAT), task.description)
        })
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSelectTask.to_string())
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(selection.map(|index| tasks[index].id))
}
