//! Owns the [`TaskStore`] on its own task so the UI keeps drawing while a
//! request is in flight. Commands run one at a time, in the order sent.

use tasko_client::TaskStore;
use tokio::sync::mpsc;

use crate::app::{Command, Outcome};

pub fn spawn(mut store: TaskStore) -> (mpsc::UnboundedSender<Command>, mpsc::UnboundedReceiver<Outcome>) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Command>();
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<Outcome>();

    tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            let outcome = execute(&mut store, command).await;
            if outcome_tx.send(outcome).is_err() {
                break;
            }
        }
        log::debug!("store worker stopped");
    });

    (command_tx, outcome_rx)
}

async fn execute(store: &mut TaskStore, command: Command) -> Outcome {
    log::debug!("running {}", command.label());

    let result = match command {
        Command::Restore => store.restore().await.map(|()| Outcome::Done(None)),
        Command::Login { email, password } => store.login(&email, &password).await.map(|()| Outcome::SignedIn),
        Command::Signup {
            name,
            email,
            password,
        } => store
            .signup(&name, &email, &password)
            .await
            .map(|()| Outcome::SignedIn),
        Command::Logout => {
            store.logout().await;
            Ok(Outcome::Done(None))
        }
        Command::Refresh => store
            .fetch_tasks()
            .await
            .map(|()| Outcome::Done(Some("Tasks refreshed"))),
        Command::Add(draft) => store
            .add_task(draft)
            .await
            .map(|_| Outcome::Saved("Task added successfully")),
        Command::Update(task) => store
            .update_task(task)
            .await
            .map(|_| Outcome::Saved("Task updated successfully")),
        Command::Delete(id) => store
            .delete_task(&id)
            .await
            .map(|()| Outcome::Done(Some("Task deleted successfully"))),
        Command::Move { task_id, target } => store.move_task(&task_id, &target).await.map(|moved| match moved {
            Some(task) => Outcome::Moved(task.id),
            None => Outcome::Done(None),
        }),
    };

    match result {
        Ok(outcome) => outcome,
        Err(e) if e.is_session_error() && store.is_authenticated() => {
            store.logout().await;
            Outcome::SessionExpired
        }
        Err(e) => Outcome::Failed(e.to_string()),
    }
}
