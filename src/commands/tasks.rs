//! One-shot task commands. Each mounts the task list controller, performs
//! at most one mutation and prints the resulting list.

use super::{open_backend, render_notifications};
use crate::{
    api::{AuthProvider, TaskBackend},
    libs::{
        controller::{TaskListController, ViewState},
        guard::ConsoleNavigator,
        messages::Message,
        task::TaskSelector,
        view::View,
    },
    msg_error, msg_print,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// What needs to be done
    description: String,
    /// Due date, YYYY-MM-DD
    #[arg(short, long)]
    due: String,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Position in `taskdue list` or task id
    task: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Position in `taskdue list` or task id
    task: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn list() -> Result<()> {
    let (auth, backend) = open_backend()?;
    let mut controller = TaskListController::mount(&auth, &backend, Arc::new(ConsoleNavigator::new())).await;
    finish(&mut controller);
    Ok(())
}

pub async fn add(args: AddArgs) -> Result<()> {
    let (auth, backend) = open_backend()?;
    let mut controller = TaskListController::mount(&auth, &backend, Arc::new(ConsoleNavigator::new())).await;
    if controller.state() == ViewState::Unauthenticated {
        return Ok(());
    }

    if let Err(e) = controller.submit(&args.description, &args.due).await {
        msg_error!(e);
        return Ok(());
    }
    finish(&mut controller);
    Ok(())
}

pub async fn toggle(args: SelectArgs) -> Result<()> {
    let (auth, backend) = open_backend()?;
    let mut controller = TaskListController::mount(&auth, &backend, Arc::new(ConsoleNavigator::new())).await;
    let Some(id) = select(&mut controller, &args.task) else {
        return Ok(());
    };

    controller.toggle_task(id).await;
    finish(&mut controller);
    Ok(())
}

pub async fn delete(args: DeleteArgs) -> Result<()> {
    let (auth, backend) = open_backend()?;
    let mut controller = TaskListController::mount(&auth, &backend, Arc::new(ConsoleNavigator::new())).await;
    let Some(id) = select(&mut controller, &args.task) else {
        return Ok(());
    };

    if !args.yes && !confirm_delete(&controller, id)? {
        return Ok(());
    }
    controller.remove_task(id).await;
    finish(&mut controller);
    Ok(())
}

/// Resolves a selector against the mounted snapshot, reporting why it
/// could not be resolved.
fn select<A: AuthProvider, B: TaskBackend>(controller: &mut TaskListController<'_, A, B>, input: &str) -> Option<uuid::Uuid> {
    if controller.state() == ViewState::Unauthenticated {
        return None;
    }
    render_notifications(controller.take_notifications());

    let selector = match TaskSelector::parse(input) {
        Ok(selector) => selector,
        Err(e) => {
            msg_error!(e);
            return None;
        }
    };
    match selector.resolve(controller.tasks()) {
        Some(task) => Some(task.id),
        None => {
            msg_error!(Message::TaskNotFound(input.to_string()));
            None
        }
    }
}

pub(crate) fn confirm_delete<A: AuthProvider, B: TaskBackend>(
    controller: &TaskListController<'_, A, B>,
    id: uuid::Uuid,
) -> Result<bool> {
    let description = controller
        .tasks()
        .iter()
        .find(|task| task.id == id)
        .map(|task| task.description.clone())
        .unwrap_or_else(|| id.to_string());

    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDeleteTask(description).to_string())
        .default(false)
        .interact()?)
}

/// Prints pending notifications and the current snapshot.
pub(crate) fn finish<A: AuthProvider, B: TaskBackend>(controller: &mut TaskListController<'_, A, B>) {
    render_notifications(controller.take_notifications());
    if controller.state() == ViewState::Unauthenticated {
        return;
    }

    if controller.tasks().is_empty() {
        msg_print!(Message::TasksEmpty);
    } else {
        msg_print!(Message::TasksHeader, true);
        View::tasks(controller.tasks());
    }
}
